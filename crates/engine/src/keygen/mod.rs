//! Primary key generation
//!
//! - [`absence`]: which supplied values count as "not provided"
//! - [`synthesizer`]: fresh values per field type
//! - [`counter`]: transactional int32 auto-increment
//! - [`encoder`]: ordered values → storage key
//! - [`generator`]: per-index orchestration
//! - [`writer`]: insert/replace using generated keys

pub mod absence;
pub mod counter;
pub mod encoder;
pub mod generator;
pub mod synthesizer;
pub mod writer;

pub use absence::{is_absent, raw_text, ZERO_DATETIME, ZERO_INT, ZERO_UUID};
pub use counter::{counter_key, CounterAllocator, COUNTER_NAME};
pub use encoder::{KeyEncoder, TupleKeyEncoder};
pub use generator::{GeneratedKey, KeyGenerator};
pub use synthesizer::{Synthesized, ValueSynthesizer};
pub use writer::{DocumentWriter, WriteMode, WriteResult};
