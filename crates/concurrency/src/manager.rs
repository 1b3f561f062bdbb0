//! Transaction manager for coordinating commit operations
//!
//! Provides atomic commit by orchestrating:
//! 1. Validation (first-committer-wins)
//! 2. Storage application (visibility)
//!
//! ## Commit Sequence
//!
//! ```text
//! 1. acquire commit_lock
//! 2. txn.commit()           - Active → Validating → Committed | Aborted
//! 3. IF conflicts: return ValidationFailed
//! 4. allocate_version()     - one version for the whole transaction,
//!                             above anything already in storage
//! 5. apply_writes()         - make writes visible
//! 6. release commit_lock, return Ok(commit_version)
//! ```

use crate::{CommitError, TransactionContext};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use strata_core::Storage;
use tracing::error;

/// Manages transaction lifecycle and atomic commits
///
/// All keys in a transaction get the same commit version.
pub struct TransactionManager {
    /// Global version counter
    ///
    /// Monotonically increasing. Each committed transaction increments by 1.
    version: AtomicU64,

    /// Next transaction ID
    next_txn_id: AtomicU64,

    /// Serializes validate-then-apply
    ///
    /// Without it two transactions that read the same counter could both
    /// validate against the pre-commit state and both apply.
    commit_lock: Mutex<()>,
}

impl TransactionManager {
    /// Create a new transaction manager
    ///
    /// # Arguments
    /// * `initial_version` - Starting version (typically the store's current version)
    pub fn new(initial_version: u64) -> Self {
        TransactionManager {
            version: AtomicU64::new(initial_version),
            next_txn_id: AtomicU64::new(1),
            commit_lock: Mutex::new(()),
        }
    }

    /// Get current global version
    pub fn current_version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }

    /// Allocate next transaction ID
    pub fn next_txn_id(&self) -> u64 {
        self.next_txn_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Allocate next commit version (increment global version)
    pub fn allocate_version(&self) -> u64 {
        self.version.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Commit a transaction atomically
    ///
    /// # Returns
    /// - Ok(commit_version) on success
    /// - Err(CommitError) if validation fails or storage rejects a write
    pub fn commit<S: Storage>(
        &self,
        txn: &mut TransactionContext,
        store: &S,
    ) -> std::result::Result<u64, CommitError> {
        let _guard = self.commit_lock.lock();

        txn.commit(store)?;

        // Direct writes advance the store's version outside the manager
        self.version
            .fetch_max(store.current_version(), Ordering::SeqCst);
        let commit_version = self.allocate_version();

        if let Err(e) = txn.apply_writes(store, commit_version) {
            error!(
                txn_id = txn.txn_id,
                commit_version,
                error = %e,
                "Failed to apply committed writes to storage"
            );
            return Err(CommitError::ApplyFailed(e.to_string()));
        }

        Ok(commit_version)
    }

    /// Abort a transaction, discarding its buffered writes
    pub fn abort(
        &self,
        txn: &mut TransactionContext,
        reason: String,
    ) -> strata_core::StrataResult<()> {
        txn.mark_aborted(reason)
    }
}

impl std::fmt::Debug for TransactionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionManager")
            .field("version", &self.current_version())
            .field("next_txn_id", &self.next_txn_id.load(Ordering::SeqCst))
            .finish()
    }
}
