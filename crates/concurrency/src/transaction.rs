//! Transaction context for OCC
//!
//! This module implements the core transaction data structure for optimistic
//! concurrency control. TransactionContext tracks the reads and buffered
//! writes of a transaction, enabling validation at commit time.

use crate::validation::{validate_transaction, ValidationResult};
use std::collections::HashMap;
use strata_core::{Key, SnapshotView, Storage, StrataError, StrataResult, Value};

/// Error type for commit failures
///
/// - All-or-nothing commit: transaction either commits or aborts entirely
/// - First-committer-wins: conflicts are detected based on read-set
#[derive(Debug, Clone)]
pub enum CommitError {
    /// Transaction aborted due to validation conflicts
    ValidationFailed(ValidationResult),

    /// Transaction was not in correct state for commit
    ///
    /// Commit requires Active state to transition to Validating
    InvalidState(String),

    /// Validation passed but applying the write set to storage failed
    ApplyFailed(String),
}

impl std::fmt::Display for CommitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommitError::ValidationFailed(result) => {
                write!(f, "Commit failed: {} conflict(s)", result.conflict_count())
            }
            CommitError::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            CommitError::ApplyFailed(msg) => write!(f, "Apply failed: {}", msg),
        }
    }
}

impl std::error::Error for CommitError {}

impl CommitError {
    /// True if the commit lost a first-committer-wins race
    pub fn is_conflict(&self) -> bool {
        matches!(self, CommitError::ValidationFailed(_))
    }
}

// Conversion to StrataError
impl From<CommitError> for StrataError {
    fn from(e: CommitError) -> Self {
        match e {
            CommitError::ValidationFailed(result) => StrataError::Conflict {
                reason: format!("Validation failed: {} conflict(s)", result.conflict_count()),
            },
            CommitError::InvalidState(msg) => StrataError::TransactionNotActive { state: msg },
            CommitError::ApplyFailed(msg) => StrataError::Storage { message: msg },
        }
    }
}

/// Status of a transaction in its lifecycle
///
/// State transitions:
/// - `Active` → `Validating` (begin commit)
/// - `Validating` → `Committed` (validation passed)
/// - `Validating` → `Aborted` (conflict detected)
/// - `Active` → `Aborted` (user abort or error)
///
/// Terminal states (no transitions allowed):
/// - `Committed`
/// - `Aborted`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionStatus {
    /// Transaction is executing, can read/write
    Active,
    /// Transaction is being validated for conflicts
    Validating,
    /// Transaction committed successfully
    Committed,
    /// Transaction was aborted
    Aborted {
        /// Human-readable reason for abort
        reason: String,
    },
}

/// Transaction context for OCC with snapshot isolation
///
/// # Read-Your-Writes Semantics
///
/// When reading a key, the transaction checks in order:
/// 1. **write_set**: Returns uncommitted write from this transaction
/// 2. **snapshot**: Returns value from snapshot, tracks in read_set
///
/// # Lifecycle
///
/// 1. **BEGIN**: Create with `with_snapshot()`, status is `Active`
/// 2. **READ/WRITE**: Use `get()`, `put()`
/// 3. **COMMIT/ABORT**: `commit()` validates, or `mark_aborted()`
pub struct TransactionContext {
    /// Unique transaction ID
    pub txn_id: u64,

    /// Version at transaction start (snapshot version)
    pub start_version: u64,

    /// Snapshot view for this transaction
    snapshot: Option<Box<dyn SnapshotView>>,

    /// Keys read and their versions (for validation)
    ///
    /// Version 0 means the key did not exist when read.
    pub read_set: HashMap<Key, u64>,

    /// Keys written with their new values (buffered)
    pub write_set: HashMap<Key, Value>,

    /// Current transaction status
    pub status: TransactionStatus,
}

impl TransactionContext {
    /// Create a new transaction context without a snapshot
    ///
    /// Primarily for testing or for transactions that only write.
    ///
    /// # Example
    ///
    /// ```
    /// use strata_concurrency::TransactionContext;
    ///
    /// let txn = TransactionContext::new(1, 100);
    /// assert!(txn.is_active());
    /// ```
    pub fn new(txn_id: u64, start_version: u64) -> Self {
        TransactionContext {
            txn_id,
            start_version,
            snapshot: None,
            read_set: HashMap::new(),
            write_set: HashMap::new(),
            status: TransactionStatus::Active,
        }
    }

    /// Create a new transaction context with a snapshot
    ///
    /// # Example
    ///
    /// ```
    /// use strata_concurrency::TransactionContext;
    /// use strata_storage::ClonedSnapshotView;
    ///
    /// let snapshot = Box::new(ClonedSnapshotView::empty(100));
    /// let txn = TransactionContext::with_snapshot(1, snapshot);
    /// assert!(txn.is_active());
    /// assert_eq!(txn.start_version, 100);
    /// ```
    pub fn with_snapshot(txn_id: u64, snapshot: Box<dyn SnapshotView>) -> Self {
        let mut txn = Self::new(txn_id, snapshot.version());
        txn.snapshot = Some(snapshot);
        txn
    }

    // === Read Operations ===

    /// Get a value from the transaction
    ///
    /// Only reads served from the snapshot are tracked in read_set:
    /// `(key, version)` if present, `(key, 0)` if absent.
    ///
    /// # Errors
    /// Returns `TransactionNotActive` if transaction is not active.
    pub fn get(&mut self, key: &Key) -> StrataResult<Option<Value>> {
        self.ensure_active()?;

        if let Some(value) = self.write_set.get(key) {
            return Ok(Some(value.clone()));
        }

        self.read_from_snapshot(key)
    }

    fn read_from_snapshot(&mut self, key: &Key) -> StrataResult<Option<Value>> {
        let snapshot = self.snapshot.as_ref().ok_or_else(|| {
            StrataError::invalid_input("Transaction has no snapshot for reads".to_string())
        })?;

        let versioned = snapshot.get(key)?;

        if let Some(vv) = versioned {
            self.read_set.insert(key.clone(), vv.version);
            Ok(Some(vv.value))
        } else {
            // If someone creates this key before we commit, we conflict
            self.read_set.insert(key.clone(), 0);
            Ok(None)
        }
    }

    // === Write Operations ===

    /// Buffer a write operation
    ///
    /// Writes are "blind": no read_set entry unless you explicitly read first.
    ///
    /// # Errors
    /// Returns `TransactionNotActive` if transaction is not active.
    pub fn put(&mut self, key: Key, value: Value) -> StrataResult<()> {
        self.ensure_active()?;
        self.write_set.insert(key, value);
        Ok(())
    }

    // === State Management ===

    /// Check if transaction is in Active state
    pub fn is_active(&self) -> bool {
        matches!(self.status, TransactionStatus::Active)
    }

    /// Check if transaction is committed
    pub fn is_committed(&self) -> bool {
        matches!(self.status, TransactionStatus::Committed)
    }

    /// Check if transaction is aborted
    pub fn is_aborted(&self) -> bool {
        matches!(self.status, TransactionStatus::Aborted { .. })
    }

    /// Check if transaction can be rolled back
    ///
    /// Once committed or aborted, rollback is not possible.
    pub fn can_rollback(&self) -> bool {
        matches!(
            self.status,
            TransactionStatus::Active | TransactionStatus::Validating
        )
    }

    /// Check if transaction can accept operations
    ///
    /// # Errors
    /// Returns `TransactionNotActive` if transaction is not in `Active` state.
    pub fn ensure_active(&self) -> StrataResult<()> {
        if self.is_active() {
            Ok(())
        } else {
            Err(StrataError::TransactionNotActive {
                state: format!("transaction {} is {:?}", self.txn_id, self.status),
            })
        }
    }

    /// Abort the transaction and discard buffered operations
    ///
    /// Can be called from `Active` (user abort) or `Validating` (conflict detected).
    ///
    /// # Errors
    /// Returns `TransactionNotActive` if already `Committed` or `Aborted`.
    pub fn mark_aborted(&mut self, reason: String) -> StrataResult<()> {
        if !self.can_rollback() {
            return Err(StrataError::TransactionNotActive {
                state: format!(
                    "cannot abort transaction {} from {:?}",
                    self.txn_id, self.status
                ),
            });
        }

        self.status = TransactionStatus::Aborted { reason };
        self.write_set.clear();
        // read_set is kept for diagnostics
        Ok(())
    }

    /// Validate against current storage and move to Committed or Aborted
    ///
    /// Callers must hold the manager's commit lock so validation and
    /// application are atomic with respect to other committers.
    pub fn commit<S: Storage>(&mut self, store: &S) -> std::result::Result<(), CommitError> {
        if !self.is_active() {
            return Err(CommitError::InvalidState(format!(
                "Cannot commit transaction {} from {:?} state - must be Active",
                self.txn_id, self.status
            )));
        }
        self.status = TransactionStatus::Validating;

        let validation_result = match validate_transaction(self, store) {
            Ok(result) => result,
            Err(e) => {
                self.status = TransactionStatus::Aborted {
                    reason: format!("Validation error: {}", e),
                };
                return Err(CommitError::ApplyFailed(e.to_string()));
            }
        };

        if !validation_result.is_valid() {
            let conflict_count = validation_result.conflict_count();
            self.status = TransactionStatus::Aborted {
                reason: format!("Commit failed: {} conflict(s) detected", conflict_count),
            };
            return Err(CommitError::ValidationFailed(validation_result));
        }

        self.status = TransactionStatus::Committed;
        Ok(())
    }

    /// Apply all buffered writes to storage
    ///
    /// All keys in this transaction get the same commit version.
    ///
    /// # Errors
    /// - `InvalidInput` if transaction is not in Committed state
    /// - Error from storage operations if they fail
    pub fn apply_writes<S: Storage>(&self, store: &S, commit_version: u64) -> StrataResult<()> {
        if !self.is_committed() {
            return Err(StrataError::invalid_input(format!(
                "Cannot apply writes: transaction {} is {:?}, must be Committed",
                self.txn_id, self.status
            )));
        }

        for (key, value) in &self.write_set {
            store.put_with_version(key.clone(), value.clone(), commit_version)?;
        }
        Ok(())
    }
}
