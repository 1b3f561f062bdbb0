//! Transaction validation for OCC
//!
//! Key rules:
//! - First-committer-wins based on READ-SET, not write-set
//! - Blind writes (write without read) do NOT conflict
//! - A key read as absent (version 0) conflicts if anyone creates it first

use crate::transaction::TransactionContext;
use std::collections::HashMap;
use strata_core::{Key, Storage, StrataError, StrataResult};

/// Types of conflicts that can occur during transaction validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictType {
    /// Read-write conflict: key was read at one version but current version differs
    ReadWriteConflict {
        /// The key that has a conflict
        key: Key,
        /// Version recorded in read_set when read
        read_version: u64,
        /// Current version in storage at validation time
        current_version: u64,
    },
}

/// Result of transaction validation
///
/// Accumulates all conflicts found during validation.
/// A transaction commits only if is_valid() returns true.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// All conflicts detected during validation
    pub conflicts: Vec<ConflictType>,
}

impl ValidationResult {
    /// Create a successful validation result (no conflicts)
    pub fn ok() -> Self {
        ValidationResult {
            conflicts: Vec::new(),
        }
    }

    /// Create a validation result with a single conflict
    pub fn conflict(conflict: ConflictType) -> Self {
        ValidationResult {
            conflicts: vec![conflict],
        }
    }

    /// Check if validation passed (no conflicts)
    pub fn is_valid(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Merge another validation result into this one
    pub fn merge(&mut self, other: ValidationResult) {
        self.conflicts.extend(other.conflicts);
    }

    /// Get the number of conflicts
    pub fn conflict_count(&self) -> usize {
        self.conflicts.len()
    }
}

/// Validate the read-set against current storage state
///
/// For each key in read_set, check if the current version matches the
/// version read; any change is a ReadWriteConflict.
///
/// # Errors
/// A storage failure aborts validation so a conflict can never be missed.
pub fn validate_read_set<S: Storage>(
    read_set: &HashMap<Key, u64>,
    store: &S,
) -> StrataResult<ValidationResult> {
    let mut result = ValidationResult::ok();

    for (key, read_version) in read_set {
        let current_version = match store.get(key) {
            Ok(Some(vv)) => vv.version,
            Ok(None) => 0,
            Err(e) => {
                return Err(StrataError::internal(format!(
                    "Storage error during read-set validation for key {}: {}",
                    key, e
                )));
            }
        };

        if current_version != *read_version {
            result.conflicts.push(ConflictType::ReadWriteConflict {
                key: key.clone(),
                read_version: *read_version,
                current_version,
            });
        }
    }

    Ok(result)
}

/// Validate a whole transaction
pub fn validate_transaction<S: Storage>(
    txn: &TransactionContext,
    store: &S,
) -> StrataResult<ValidationResult> {
    validate_read_set(&txn.read_set, store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::Value;
    use strata_storage::UnifiedStore;

    #[test]
    fn test_unchanged_read_set_is_valid() {
        let store = UnifiedStore::new();
        let key = Key::new_generator("t", "int32_id");
        let v = store.put(key.clone(), Value::Int(1)).unwrap();

        let mut read_set = HashMap::new();
        read_set.insert(key, v);
        assert!(validate_read_set(&read_set, &store).unwrap().is_valid());
    }

    #[test]
    fn test_changed_key_conflicts() {
        let store = UnifiedStore::new();
        let key = Key::new_generator("t", "int32_id");
        let v = store.put(key.clone(), Value::Int(1)).unwrap();
        store.put(key.clone(), Value::Int(2)).unwrap();

        let mut read_set = HashMap::new();
        read_set.insert(key.clone(), v);
        let result = validate_read_set(&read_set, &store).unwrap();
        assert_eq!(result.conflict_count(), 1);
        assert_eq!(
            result.conflicts[0],
            ConflictType::ReadWriteConflict {
                key,
                read_version: 1,
                current_version: 2
            }
        );
    }

    #[test]
    fn test_absent_key_created_concurrently_conflicts() {
        let store = UnifiedStore::new();
        let key = Key::new_generator("t", "int32_id");

        let mut read_set = HashMap::new();
        read_set.insert(key.clone(), 0);
        store.put(key, Value::Int(1)).unwrap();

        assert!(!validate_read_set(&read_set, &store).unwrap().is_valid());
    }

    #[test]
    fn test_merge_accumulates() {
        let key = Key::new_data("t", vec![1]);
        let mut a = ValidationResult::ok();
        a.merge(ValidationResult::conflict(ConflictType::ReadWriteConflict {
            key,
            read_version: 1,
            current_version: 2,
        }));
        assert_eq!(a.conflict_count(), 1);
        assert!(!a.is_valid());
    }
}
