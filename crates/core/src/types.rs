//! Core types for Strata storage keys
//!
//! This module defines the foundational key types:
//! - Subspace: Discriminator separating user data from reserved system state
//! - Key: Composite key (subspace + table + user_key)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Subspace tag for discriminating key namespaces in unified storage
///
/// User documents and generator bookkeeping share one ordered store.
/// The subspace is the first component of every key so the two never
/// interleave and a scan of one can never observe the other.
///
/// ## Subspace Values
///
/// These values are part of the storage format and MUST NOT change:
/// - Data = 0x01
/// - Generator = 0x02
///
/// Ordering: Data < Generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[repr(u8)]
pub enum Subspace {
    /// User documents, keyed by their encoded primary key
    Data = 0x01,
    /// Reserved namespace for key generator state (auto-increment counters)
    Generator = 0x02,
}

impl Subspace {
    /// Convert to byte representation
    pub fn as_byte(&self) -> u8 {
        *self as u8
    }

    /// Try to create from byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(Subspace::Data),
            0x02 => Some(Subspace::Generator),
            _ => None,
        }
    }

    /// Name used in the textual key form
    pub fn as_str(&self) -> &'static str {
        match self {
            Subspace::Data => "data",
            Subspace::Generator => "generator",
        }
    }
}

impl fmt::Display for Subspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unified key for all storage entries
///
/// A Key combines a subspace, the owning table, and user-defined key bytes.
///
/// # Ordering
///
/// Keys are ordered by: subspace → table → user_key
///
/// # Examples
///
/// ```
/// use strata_core::Key;
///
/// let counter = Key::new_generator("orders", "int32_id");
/// assert_eq!(counter.to_string(), "generator/orders/int32_id");
///
/// let row = Key::new_data("orders", vec![0x01, 0x02]);
/// assert!(row.starts_with(&Key::new_data("orders", vec![0x01])));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Key {
    /// Namespace discriminator (Data, Generator)
    pub subspace: Subspace,
    /// Table the entry belongs to
    pub table: String,
    /// User-defined key bytes (supports arbitrary binary keys)
    pub user_key: Vec<u8>,
}

impl Key {
    /// Create a new key with the given subspace, table, and user key
    pub fn new(subspace: Subspace, table: impl Into<String>, user_key: Vec<u8>) -> Self {
        Self {
            subspace,
            table: table.into(),
            user_key,
        }
    }

    /// Create a user data key
    pub fn new_data(table: impl Into<String>, user_key: Vec<u8>) -> Self {
        Self::new(Subspace::Data, table, user_key)
    }

    /// Create a key in the reserved generator subspace
    pub fn new_generator(table: impl Into<String>, name: impl AsRef<[u8]>) -> Self {
        Self::new(Subspace::Generator, table, name.as_ref().to_vec())
    }

    /// Check if this key starts with the given prefix
    ///
    /// Subspace and table must match exactly; user_key is compared by prefix.
    pub fn starts_with(&self, prefix: &Key) -> bool {
        self.subspace == prefix.subspace
            && self.table == prefix.table
            && self.user_key.starts_with(&prefix.user_key)
    }

    /// Total encoded size in bytes, used for limits and diagnostics
    pub fn len(&self) -> usize {
        1 + self.table.len() + self.user_key.len()
    }

    /// True if the user key is empty
    pub fn is_empty(&self) -> bool {
        self.user_key.is_empty()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.subspace,
            self.table,
            self.user_key.escape_ascii()
        )
    }
}
