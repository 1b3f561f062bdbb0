//! ClonedSnapshotView: snapshot implementation via deep clone
//!
//! This module provides version-bounded views of storage for transaction isolation.
//! The snapshot is a deep clone of the BTreeMap taken under the read lock.
//!
//! # Design Notes
//!
//! - **Immutable**: Once created, the snapshot never changes
//! - **Thread-safe**: Can be safely shared across threads (Arc-wrapped data)
//! - **Version-bounded**: Only returns data visible at snapshot version

use std::collections::BTreeMap;
use std::sync::Arc;

use strata_core::{Key, SnapshotView, StrataResult, VersionedValue};

/// A snapshot view that clones the entire BTreeMap
///
/// # Example
///
/// ```ignore
/// let store = UnifiedStore::new();
/// let snapshot = store.create_snapshot();
///
/// // Writes after snapshot creation are not visible
/// store.put(key.clone(), value)?;
/// assert!(snapshot.get(&key)?.is_none());
/// ```
#[derive(Debug, Clone)]
pub struct ClonedSnapshotView {
    /// The version at which this snapshot was created
    version: u64,
    /// Deep clone of the storage data at snapshot time
    data: Arc<BTreeMap<Key, VersionedValue>>,
}

impl ClonedSnapshotView {
    /// Create a new ClonedSnapshotView from existing data
    ///
    /// This is typically called by `UnifiedStore::create_snapshot()`, not directly.
    pub fn new(version: u64, data: BTreeMap<Key, VersionedValue>) -> Self {
        Self {
            version,
            data: Arc::new(data),
        }
    }

    /// Create an empty snapshot at the given version
    pub fn empty(version: u64) -> Self {
        Self::new(version, BTreeMap::new())
    }

    /// Number of keys visible in this snapshot
    pub fn len(&self) -> usize {
        self.data
            .values()
            .filter(|vv| vv.version <= self.version)
            .count()
    }

    /// True if no keys are visible
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SnapshotView for ClonedSnapshotView {
    fn get(&self, key: &Key) -> StrataResult<Option<VersionedValue>> {
        match self.data.get(key) {
            Some(vv) if vv.version <= self.version => Ok(Some(vv.clone())),
            _ => Ok(None),
        }
    }

    fn version(&self) -> u64 {
        self.version
    }
}
