//! Core traits for storage and snapshot abstraction
//!
//! This module defines the Storage and SnapshotView traits that let the
//! concurrency layer validate and apply transactions without knowing how
//! the backing store is laid out.

use crate::error::StrataResult;
use crate::types::Key;
use crate::value::Value;
use crate::versioned::VersionedValue;

/// Storage abstraction for the unified backend
///
/// Thread safety: All methods must be safe to call concurrently from
/// multiple threads (requires Send + Sync).
pub trait Storage: Send + Sync {
    /// Get current value for key (latest version)
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn get(&self, key: &Key) -> StrataResult<Option<VersionedValue>>;

    /// Put key-value pair, allocating a fresh version
    ///
    /// Returns the version assigned to this write.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn put(&self, key: Key, value: Value) -> StrataResult<u64>;

    /// Put a value with a specific version
    ///
    /// Used by transaction commit to apply writes with the commit version.
    /// All keys in a transaction get the same commit version.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn put_with_version(&self, key: Key, value: Value, version: u64) -> StrataResult<()>;

    /// Get current global version
    ///
    /// Returns the highest version assigned so far.
    fn current_version(&self) -> u64;
}

/// Snapshot view abstraction for snapshot isolation
///
/// Provides a read view of storage frozen at a version.
///
/// Thread safety: Must be safe to pass between threads (Send + Sync).
pub trait SnapshotView: Send + Sync {
    /// Get value from snapshot
    ///
    /// Returns None if key didn't exist at the snapshot version.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn get(&self, key: &Key) -> StrataResult<Option<VersionedValue>>;

    /// Get snapshot version
    fn version(&self) -> u64;
}
