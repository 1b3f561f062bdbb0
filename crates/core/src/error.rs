//! Error types for the Strata write path
//!
//! This module defines the single error enum used throughout the key
//! generation subsystem and the storage layers beneath it.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! ## Error classes
//!
//! | Class | Variants | Retried? |
//! |---|---|---|
//! | Invalid argument | `MissingKeyColumn`, `UnsupportedAutoGenerate`, `MalformedValue`, `InvalidInput` | never |
//! | Conflict | `Conflict` | by the retry loop only |
//! | Retry outcome | `RetryExhausted`, `Cancelled`, `DeadlineExceeded` | never |
//! | Storage | `Storage`, `Corruption`, `TransactionNotActive`, `Internal` | never |

use thiserror::Error;

use crate::schema::FieldType;

/// Result type alias for Strata operations
pub type StrataResult<T> = std::result::Result<T, StrataError>;

/// Error types for the Strata write path
#[derive(Debug, Error)]
pub enum StrataError {
    /// A non-auto-generated key field is absent from the document
    #[error("missing index key column(s) '{field}'")]
    MissingKeyColumn {
        /// Name of the missing field
        field: String,
    },

    /// A field flagged for auto-generation has a type with no synthesis rule
    #[error("unsupported type '{field_type}' found in auto-generator for field '{field}'")]
    UnsupportedAutoGenerate {
        /// Name of the field
        field: String,
        /// Declared type of the field
        field_type: FieldType,
    },

    /// A supplied key value cannot be parsed as the field's declared type
    #[error("malformed value for field '{field}': {reason}")]
    MalformedValue {
        /// Name of the field
        field: String,
        /// What was wrong with the value
        reason: String,
    },

    /// Generic invalid argument (bad document, schema or configuration)
    #[error("invalid input: {message}")]
    InvalidInput {
        /// Description of the problem
        message: String,
    },

    /// Transactional conflict detected at commit time
    #[error("transaction conflict: {reason}")]
    Conflict {
        /// Description of the conflict
        reason: String,
    },

    /// A conflict-driven retry loop ran out of attempts
    #[error("retries exhausted after {attempts} attempt(s): {last_error}")]
    RetryExhausted {
        /// Number of attempts made (first attempt included)
        attempts: usize,
        /// The conflict observed on the final attempt
        last_error: Box<StrataError>,
    },

    /// The enclosing request was cancelled
    #[error("operation cancelled")]
    Cancelled,

    /// The enclosing request's deadline passed
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// An insert found a row already stored under the generated key
    #[error("duplicate key: {key}")]
    DuplicateKey {
        /// Display form of the key
        key: String,
    },

    /// A counter or other bounded resource cannot advance
    #[error("capacity exceeded: {reason}")]
    CapacityExceeded {
        /// Description of the exhausted resource
        reason: String,
    },

    /// Storage layer error
    #[error("storage error: {message}")]
    Storage {
        /// Description of the failure
        message: String,
    },

    /// Persisted data does not have the expected shape
    #[error("data corruption: {message}")]
    Corruption {
        /// Description of the corruption
        message: String,
    },

    /// Operation attempted on a transaction that is no longer active
    #[error("transaction not active: {state}")]
    TransactionNotActive {
        /// The state the transaction was in
        state: String,
    },

    /// Internal invariant violated
    #[error("internal error: {message}")]
    Internal {
        /// Description of the failure
        message: String,
    },
}

impl StrataError {
    /// Create a missing key column error
    pub fn missing_key_column(field: impl Into<String>) -> Self {
        StrataError::MissingKeyColumn {
            field: field.into(),
        }
    }

    /// Create a malformed value error
    pub fn malformed(field: impl Into<String>, reason: impl Into<String>) -> Self {
        StrataError::MalformedValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        StrataError::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a conflict error
    pub fn conflict(reason: impl Into<String>) -> Self {
        StrataError::Conflict {
            reason: reason.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        StrataError::Storage {
            message: message.into(),
        }
    }

    /// Create a corruption error
    pub fn corruption(message: impl Into<String>) -> Self {
        StrataError::Corruption {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        StrataError::Internal {
            message: message.into(),
        }
    }

    /// True for commit-time transactional conflicts, the only retryable error
    pub fn is_conflict(&self) -> bool {
        matches!(self, StrataError::Conflict { .. })
    }

    /// True for errors the client caused and must fix before retrying
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            StrataError::MissingKeyColumn { .. }
                | StrataError::UnsupportedAutoGenerate { .. }
                | StrataError::MalformedValue { .. }
                | StrataError::InvalidInput { .. }
        )
    }

    /// Stable error code for API surfaces
    pub fn error_code(&self) -> &'static str {
        match self {
            StrataError::MissingKeyColumn { .. }
            | StrataError::UnsupportedAutoGenerate { .. }
            | StrataError::MalformedValue { .. }
            | StrataError::InvalidInput { .. } => "InvalidArgument",
            StrataError::Conflict { .. } => "Conflict",
            StrataError::RetryExhausted { .. } => "RetryExhausted",
            StrataError::Cancelled => "Cancelled",
            StrataError::DeadlineExceeded => "DeadlineExceeded",
            StrataError::DuplicateKey { .. } => "AlreadyExists",
            StrataError::CapacityExceeded { .. } => "ResourceExhausted",
            StrataError::Storage { .. } => "Storage",
            StrataError::Corruption { .. } => "Corruption",
            StrataError::TransactionNotActive { .. } => "TransactionNotActive",
            StrataError::Internal { .. } => "Internal",
        }
    }
}

impl From<serde_json::Error> for StrataError {
    fn from(e: serde_json::Error) -> Self {
        StrataError::invalid_input(e.to_string())
    }
}
