//! Versioned values returned by storage reads

use crate::value::Value;

/// A value together with the commit version that wrote it
///
/// Versions are assigned by the storage layer, start at 1, and increase
/// monotonically. Version 0 means "never written" and is only used in
/// read sets to record that a key did not exist.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionedValue {
    /// The stored value
    pub value: Value,
    /// Commit version that produced it
    pub version: u64,
}

impl VersionedValue {
    /// Create a new versioned value
    pub fn new(value: Value, version: u64) -> Self {
        Self { value, version }
    }
}
