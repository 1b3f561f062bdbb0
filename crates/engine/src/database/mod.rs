//! Database struct and transaction API
//!
//! This module provides the Database struct that ties together:
//! - Unified in-memory storage
//! - The OCC transaction manager
//! - The [`TransactionalStore`] seam used by the key generator
//!
//! ## Transaction API
//!
//! 1. **Retry API** (recommended): [`transaction_with_retry`]
//!    - Automatic commit on success, rollback on error
//!    - Conflicts are retried with backoff
//!
//! 2. **Manual API**: [`TransactionalStore::begin`] + commit/rollback
//!    - For cases requiring external control over commit timing

pub mod config;
mod transactions;

pub use config::{KeygenConfig, CONFIG_FILE_NAME};
pub use transactions::{transaction_with_retry, RetryConfig};

use std::sync::Arc;

use strata_concurrency::{TransactionContext, TransactionManager};
use strata_core::{Key, Storage, StrataResult, Value};
use strata_storage::UnifiedStore;
use tracing::debug;

use crate::transaction_ops::{StoreTransaction, TransactionalStore};

/// Main database struct
///
/// Thread-safe: share it behind an `Arc` across request threads.
pub struct Database {
    /// Unified storage backend
    storage: Arc<UnifiedStore>,

    /// Commit coordination
    coordinator: Arc<TransactionManager>,
}

impl Database {
    /// Create an empty in-memory database
    pub fn new() -> Self {
        let storage = Arc::new(UnifiedStore::new());
        let coordinator = Arc::new(TransactionManager::new(storage.current_version()));
        Self {
            storage,
            coordinator,
        }
    }

    /// Direct access to the storage backend
    pub fn storage(&self) -> &Arc<UnifiedStore> {
        &self.storage
    }

    /// Latest committed version
    pub fn current_version(&self) -> u64 {
        self.coordinator.current_version()
    }

    /// Read the latest committed value of a key outside any transaction
    pub fn get(&self, key: &Key) -> StrataResult<Option<Value>> {
        Ok(self.storage.get(key)?.map(|vv| vv.value))
    }

    /// Begin a transaction over a snapshot of current storage
    pub fn begin_transaction(&self) -> DatabaseTransaction {
        let txn_id = self.coordinator.next_txn_id();
        let snapshot = self.storage.create_snapshot();
        DatabaseTransaction {
            ctx: TransactionContext::with_snapshot(txn_id, Box::new(snapshot)),
            storage: Arc::clone(&self.storage),
            coordinator: Arc::clone(&self.coordinator),
        }
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("version", &self.current_version())
            .field("keys", &self.storage.len())
            .finish()
    }
}

impl TransactionalStore for Database {
    fn begin(&self) -> StrataResult<Box<dyn StoreTransaction>> {
        Ok(Box::new(self.begin_transaction()))
    }
}

/// A transaction opened by [`Database`]
pub struct DatabaseTransaction {
    ctx: TransactionContext,
    storage: Arc<UnifiedStore>,
    coordinator: Arc<TransactionManager>,
}

impl DatabaseTransaction {
    /// Transaction id
    pub fn txn_id(&self) -> u64 {
        self.ctx.txn_id
    }
}

impl StoreTransaction for DatabaseTransaction {
    fn read(&mut self, key: &Key) -> StrataResult<Option<Value>> {
        self.ctx.get(key)
    }

    fn replace(&mut self, key: Key, value: Value) -> StrataResult<()> {
        self.ctx.put(key, value)
    }

    fn commit(mut self: Box<Self>) -> StrataResult<u64> {
        let version = self
            .coordinator
            .commit(&mut self.ctx, self.storage.as_ref())?;
        debug!(txn_id = self.ctx.txn_id, version, "Transaction committed");
        Ok(version)
    }

    fn rollback(mut self: Box<Self>) {
        if self.ctx.can_rollback() {
            let _ = self
                .coordinator
                .abort(&mut self.ctx, "rolled back by caller".to_string());
        }
    }
}
