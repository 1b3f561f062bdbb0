//! UnifiedStore: storage backend with BTreeMap and version management
//!
//! This module implements the Storage trait using:
//! - `BTreeMap<Key, VersionedValue>` for ordered key storage
//! - `parking_lot::RwLock` for thread-safe access
//! - `AtomicU64` for monotonically increasing version numbers
//!
//! # Design Notes
//!
//! - **No version history**: Each key stores only its latest value
//! - **Version allocation before write lock**: Prevents lock contention during version assignment
//! - **Commit versions**: `put_with_version` raises the global version to at least the
//!   commit version so snapshots taken afterwards observe the write

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use strata_core::{Key, Storage, StrataResult, Value, VersionedValue};

use crate::snapshot::ClonedSnapshotView;

/// Unified storage backend using BTreeMap with RwLock
///
/// Thread-safe through `parking_lot::RwLock` and `AtomicU64`.
/// User documents and generator counters live side by side, separated by
/// the key's subspace.
#[derive(Debug)]
pub struct UnifiedStore {
    /// The main data store: ordered map from Key to its latest VersionedValue
    data: Arc<RwLock<BTreeMap<Key, VersionedValue>>>,
    /// Global version counter for monotonically increasing versions
    version: AtomicU64,
}

impl UnifiedStore {
    /// Create a new empty UnifiedStore
    ///
    /// Initial version is 0 (no writes have occurred).
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(BTreeMap::new())),
            version: AtomicU64::new(0),
        }
    }

    /// Allocate the next version atomically
    ///
    /// Uses fetch_add with SeqCst ordering to ensure:
    /// - Versions are unique across all threads
    /// - Versions are monotonically increasing (1, 2, 3, ...)
    fn next_version(&self) -> u64 {
        self.version.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Create a snapshot of the current state
    ///
    /// The snapshot captures the data at the current version and is immutable.
    pub fn create_snapshot(&self) -> ClonedSnapshotView {
        let data = self.data.read();
        let version = self.current_version();
        ClonedSnapshotView::new(version, data.clone())
    }

    /// All live entries whose key starts with `prefix`, in key order
    pub fn scan_prefix(&self, prefix: &Key) -> Vec<(Key, VersionedValue)> {
        let data = self.data.read();
        data.range(prefix.clone()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Number of keys stored
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// True if nothing has been stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for UnifiedStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for UnifiedStore {
    fn get(&self, key: &Key) -> StrataResult<Option<VersionedValue>> {
        let data = self.data.read();
        Ok(data.get(key).cloned())
    }

    fn put(&self, key: Key, value: Value) -> StrataResult<u64> {
        // Allocate version BEFORE acquiring write lock
        let version = self.next_version();
        let mut data = self.data.write();
        data.insert(key, VersionedValue::new(value, version));
        Ok(version)
    }

    fn put_with_version(&self, key: Key, value: Value, version: u64) -> StrataResult<()> {
        let mut data = self.data.write();
        data.insert(key, VersionedValue::new(value, version));
        self.version.fetch_max(version, Ordering::SeqCst);
        Ok(())
    }

    fn current_version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }
}
