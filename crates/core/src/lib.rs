//! Core types and traits for Strata
//!
//! This crate defines the foundational types used throughout the write path:
//! - StrataError: Error type hierarchy
//! - Key / Subspace: Composite storage key separating user data from generator state
//! - Value / VersionedValue: Untyped stored values
//! - FieldType / Field / Index: Read-only schema metadata
//! - TypedValue: Schema-typed key values
//! - Document / FieldSlot: Client documents on the write path
//! - Traits: Storage and SnapshotView

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod error;
pub mod schema;
pub mod traits;
pub mod typed;
pub mod types;
pub mod value;
pub mod versioned;

pub use document::{Document, FieldSlot};
pub use error::{StrataError, StrataResult};
pub use schema::{Field, FieldType, Index};
pub use traits::{SnapshotView, Storage};
pub use typed::{format_datetime, parse_datetime, TypedValue};
pub use types::{Key, Subspace};
pub use value::Value;
pub use versioned::VersionedValue;
