//! End-to-end key generation scenarios
//!
//! Each module drives the public facade the way an insert/replace handler
//! would: build a schema index, submit documents, inspect keys, documents
//! and persisted counters.

mod common;

mod absence;
mod counter;
mod forced_insert;
mod missing_column;
mod uuid_synthesis;
