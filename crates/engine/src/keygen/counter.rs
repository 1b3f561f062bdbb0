//! Per-table int32 auto-increment counters
//!
//! ## Record layout
//!
//! One record per table in the generator subspace:
//!
//! ```text
//! key:   generator/<table>/int32_id
//! value: Bytes([u8; 4])   big-endian u32, count of ids ever allocated
//! ```
//!
//! An absent record reads as 0, so the first id handed out is 1.
//!
//! ## Allocation
//!
//! Each call runs read → increment → write → commit in its own transaction.
//! The read puts the counter key in the read set, so of two transactions
//! that saw the same value only the first to commit succeeds; the other
//! gets a conflict and is retried against the new value. No application
//! lock is involved.

use byteorder::{BigEndian, ByteOrder};
use std::sync::Arc;
use tracing::debug;

use strata_core::{Key, StrataError, StrataResult, Value};

use crate::context::RequestContext;
use crate::database::{transaction_with_retry, RetryConfig};
use crate::transaction_ops::TransactionalStore;

/// Name of the int32 counter within a table's generator namespace
pub const COUNTER_NAME: &str = "int32_id";

/// Storage key of a table's int32 counter
pub fn counter_key(table: &str) -> Key {
    Key::new_generator(table, COUNTER_NAME)
}

fn decode_counter(table: &str, value: &Value) -> StrataResult<u32> {
    match value.as_bytes() {
        Some(bytes) if bytes.len() == 4 => Ok(BigEndian::read_u32(bytes)),
        Some(bytes) => Err(StrataError::corruption(format!(
            "counter record for table '{}' has {} byte(s), expected 4",
            table,
            bytes.len()
        ))),
        None => Err(StrataError::corruption(format!(
            "counter record for table '{}' holds {}, expected Bytes",
            table,
            value.type_name()
        ))),
    }
}

fn encode_counter(n: u32) -> Value {
    let mut buf = [0u8; 4];
    BigEndian::write_u32(&mut buf, n);
    Value::Bytes(buf.to_vec())
}

/// Allocates unique, increasing int32 ids per table
#[derive(Clone)]
pub struct CounterAllocator {
    store: Arc<dyn TransactionalStore>,
    retry: RetryConfig,
}

impl CounterAllocator {
    /// Allocator over `store` using `retry` for conflicting increments
    pub fn new(store: Arc<dyn TransactionalStore>, retry: RetryConfig) -> Self {
        Self { store, retry }
    }

    /// Retry policy in effect
    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    /// Allocate the next id for `table`
    ///
    /// # Errors
    /// - `CapacityExceeded` when the counter has reached `i32::MAX`
    /// - `Corruption` when the stored record is malformed
    /// - `RetryExhausted`, `Cancelled` or `DeadlineExceeded` from the retry loop
    /// - storage errors, unretried
    pub fn allocate(&self, ctx: &RequestContext, table: &str) -> StrataResult<i32> {
        let key = counter_key(table);
        let mut attempts = 0usize;

        let id = transaction_with_retry(self.store.as_ref(), ctx, &self.retry, |txn| {
            attempts += 1;
            let current = match txn.read(&key)? {
                Some(value) => decode_counter(table, &value)?,
                None => 0,
            };
            let next = i32::try_from(current)
                .ok()
                .and_then(|c| c.checked_add(1))
                .ok_or_else(|| StrataError::CapacityExceeded {
                    reason: format!("int32 counter for table '{}' is exhausted", table),
                })?;
            txn.replace(key.clone(), encode_counter(next as u32))?;
            Ok(next)
        })?;

        debug!(table, id, attempts, "Allocated int32 id");
        Ok(id)
    }

    /// Persisted counter value for `table` (0 if never allocated)
    pub fn current(&self, table: &str) -> StrataResult<u32> {
        let mut txn = self.store.begin()?;
        let result = txn.read(&counter_key(table));
        txn.rollback();
        match result? {
            Some(value) => decode_counter(table, &value),
            None => Ok(0),
        }
    }
}

impl std::fmt::Debug for CounterAllocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CounterAllocator")
            .field("retry", &self.retry)
            .finish()
    }
}
