//! Strata key generation
//!
//! Primary-key generation for the Strata document write path. When an
//! insert or replace omits a value for an auto-generated key field, a
//! type-appropriate value is synthesized, spliced into the document, and
//! the composite storage key is produced. Int32 fields draw from a
//! per-table counter kept in the same transactional store as the data.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use strata_keygen::{
//!     Database, Document, DocumentWriter, Field, FieldType, Index, KeygenConfig, RequestContext,
//! };
//!
//! let db = Arc::new(Database::new());
//! let writer = DocumentWriter::new(db, &KeygenConfig::default()).unwrap();
//! let index = Index::primary(vec![Field::new("id", FieldType::Int32).auto_generated()]).unwrap();
//!
//! let doc = Document::parse(br#"{"item":"book"}"#).unwrap();
//! let written = writer.insert(&RequestContext::new(), "orders", &index, &doc).unwrap();
//! assert_eq!(written.response_keys, r#"{"id":1}"#);
//! ```
//!
//! # Architecture
//!
//! - `strata-core`: keys, values, schema, documents, errors
//! - `strata-storage`: in-memory versioned store
//! - `strata-concurrency`: optimistic transactions, first-committer-wins
//! - `strata-engine`: database, retry loop, key generation

pub use strata_core::{
    Document, Field, FieldSlot, FieldType, Index, Key, StrataError, StrataResult, Subspace,
    TypedValue, Value,
};
pub use strata_engine::*;
