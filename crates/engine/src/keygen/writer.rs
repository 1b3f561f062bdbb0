//! Insert/replace handler that consumes generated keys
//!
//! Stores each document as compact JSON bytes under its generated key.
//! Insert-only writes read the key first, so two writers racing on the
//! same key conflict at commit and the loser sees `DuplicateKey` on retry.

use std::sync::Arc;
use tracing::debug;

use strata_core::{Document, Index, Key, StrataError, StrataResult, Value};

use super::generator::KeyGenerator;
use crate::context::RequestContext;
use crate::database::{transaction_with_retry, Database, KeygenConfig, RetryConfig};

/// How a write treats an existing row under the same key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Fail with `DuplicateKey` if the key exists
    Insert,
    /// Overwrite, unless key generation forced insert-only semantics
    Replace,
}

/// Outcome of a successful write
#[derive(Debug, Clone, PartialEq)]
pub struct WriteResult {
    /// Storage key the document was written under
    pub key: Key,
    /// The stored document, including synthesized fields
    pub document: Document,
    /// Key-only JSON object for the API response
    pub response_keys: String,
    /// Whether insert-only semantics were applied because of the key
    pub forced_insert: bool,
}

/// Writes documents under generated primary keys
#[derive(Debug, Clone)]
pub struct DocumentWriter {
    db: Arc<Database>,
    generator: KeyGenerator,
    retry: RetryConfig,
}

impl DocumentWriter {
    /// Writer over `db` configured from `config`
    pub fn new(db: Arc<Database>, config: &KeygenConfig) -> StrataResult<Self> {
        let generator = KeyGenerator::for_store(db.clone(), config)?;
        Ok(Self::with_generator(db, generator, config.write_retry_config()?))
    }

    /// Writer with an explicit generator and write retry policy
    pub fn with_generator(db: Arc<Database>, generator: KeyGenerator, retry: RetryConfig) -> Self {
        Self {
            db,
            generator,
            retry,
        }
    }

    /// The key generator
    pub fn generator(&self) -> &KeyGenerator {
        &self.generator
    }

    /// Insert a document; fails if its key already exists
    pub fn insert(
        &self,
        ctx: &RequestContext,
        table: &str,
        index: &Index,
        document: &Document,
    ) -> StrataResult<WriteResult> {
        self.write(ctx, WriteMode::Insert, table, index, document)
    }

    /// Insert or overwrite a document
    ///
    /// Becomes an insert when a timestamp-based key was synthesized.
    pub fn replace(
        &self,
        ctx: &RequestContext,
        table: &str,
        index: &Index,
        document: &Document,
    ) -> StrataResult<WriteResult> {
        self.write(ctx, WriteMode::Replace, table, index, document)
    }

    /// Run key generation and store the result in one transaction
    pub fn write(
        &self,
        ctx: &RequestContext,
        mode: WriteMode,
        table: &str,
        index: &Index,
        document: &Document,
    ) -> StrataResult<WriteResult> {
        let generated = self.generator.generate(ctx, table, index, document)?;
        let insert_only = mode == WriteMode::Insert || generated.force_insert;
        let stored = Value::Bytes(generated.document.to_bytes());
        let key = &generated.key;

        transaction_with_retry(self.db.as_ref(), ctx, &self.retry, |txn| {
            if insert_only && txn.read(key)?.is_some() {
                return Err(StrataError::DuplicateKey {
                    key: key.to_string(),
                });
            }
            txn.replace(key.clone(), stored.clone())?;
            Ok(())
        })?;

        debug!(table, key = %key, ?mode, insert_only, "Document written");

        let response_keys = generated.response_fragment();
        Ok(WriteResult {
            key: generated.key,
            document: generated.document,
            response_keys,
            forced_insert: generated.force_insert,
        })
    }

    /// Read back a stored document
    ///
    /// # Errors
    /// `Corruption` if the stored value is not a JSON document.
    pub fn get(&self, key: &Key) -> StrataResult<Option<Document>> {
        match self.db.get(key)? {
            None => Ok(None),
            Some(Value::Bytes(bytes)) => Document::parse(&bytes)
                .map(Some)
                .map_err(|e| StrataError::corruption(format!("document at {}: {}", key, e))),
            Some(other) => Err(StrataError::corruption(format!(
                "document at {} is {}, expected Bytes",
                key,
                other.type_name()
            ))),
        }
    }
}
