//! Write-path engine for Strata
//!
//! This crate orchestrates the lower layers for insert/replace requests:
//! - Database: in-memory store plus OCC transaction manager
//! - Transaction retry with exponential backoff and request cancellation
//! - Primary key generation, including transactional int32 counters
//! - Configuration via `keygen.toml`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod context;
pub mod database;
pub mod keygen;
pub mod transaction_ops;

pub use context::RequestContext;
pub use database::{
    transaction_with_retry, Database, DatabaseTransaction, KeygenConfig, RetryConfig,
    CONFIG_FILE_NAME,
};
pub use keygen::{
    counter_key, is_absent, CounterAllocator, DocumentWriter, GeneratedKey, KeyEncoder,
    KeyGenerator, Synthesized, TupleKeyEncoder, ValueSynthesizer, WriteMode, WriteResult,
    COUNTER_NAME, ZERO_DATETIME, ZERO_INT, ZERO_UUID,
};
pub use transaction_ops::{StoreTransaction, TransactionalStore};
