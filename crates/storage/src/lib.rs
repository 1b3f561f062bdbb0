//! Storage layer for Strata
//!
//! This crate implements the unified storage backend with:
//! - UnifiedStore: BTreeMap-based storage with RwLock
//! - Version management with AtomicU64
//! - ClonedSnapshotView implementation

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod snapshot;
pub mod unified;

pub use snapshot::ClonedSnapshotView;
pub use unified::UnifiedStore;
