//! Transactional store seam
//!
//! The key generator only needs four things from a store: begin a
//! transaction, read a key, replace a key, and commit or roll back.
//! [`crate::Database`] implements these over the OCC stack; tests can
//! substitute stores that inject conflicts or failures.

use strata_core::{Key, StrataResult, Value};

/// A store that can open transactions
pub trait TransactionalStore: Send + Sync {
    /// Start a new transaction on a fresh snapshot
    fn begin(&self) -> StrataResult<Box<dyn StoreTransaction>>;
}

/// One open transaction
///
/// Reads are snapshot reads and are tracked for commit-time validation.
/// Writes are buffered until [`commit`](StoreTransaction::commit).
pub trait StoreTransaction: Send {
    /// Read a key; `None` if it does not exist in this transaction's view
    fn read(&mut self, key: &Key) -> StrataResult<Option<Value>>;

    /// Buffer an unconditional write
    fn replace(&mut self, key: Key, value: Value) -> StrataResult<()>;

    /// Validate and apply buffered writes, returning the commit version
    ///
    /// # Errors
    /// `Conflict` when another transaction committed a change to a key this
    /// one read. Any other error is not retryable.
    fn commit(self: Box<Self>) -> StrataResult<u64>;

    /// Discard buffered writes
    fn rollback(self: Box<Self>);
}
