//! Schema metadata consumed by the key generator
//!
//! Fields and indexes are loaded once per table and shared read-only
//! across every write request. Nothing here is mutated after construction.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::{StrataError, StrataResult};

/// Declared type of a document field
///
/// A closed set: adding a type means extending every exhaustive match in the
/// absence detector, the value synthesizer and [`crate::TypedValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// UTF-8 string
    String,
    /// RFC 4122 UUID, carried as its canonical hyphenated string
    Uuid,
    /// Binary data, carried in JSON as base64 text
    Byte,
    /// RFC 3339 timestamp
    DateTime,
    /// 64-bit signed integer
    Int64,
    /// 32-bit signed integer
    Int32,
    /// 64-bit float
    Double,
    /// Boolean
    Bool,
    /// JSON array (never a key type)
    Array,
    /// JSON object (never a key type)
    Object,
}

impl FieldType {
    /// Lowercase schema name of the type
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Uuid => "uuid",
            FieldType::Byte => "byte",
            FieldType::DateTime => "datetime",
            FieldType::Int64 => "int64",
            FieldType::Int32 => "int32",
            FieldType::Double => "double",
            FieldType::Bool => "bool",
            FieldType::Array => "array",
            FieldType::Object => "object",
        }
    }

    /// Whether a field of this type may appear in a primary index
    pub fn is_key_type(&self) -> bool {
        !matches!(self, FieldType::Array | FieldType::Object)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A schema field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Top-level document attribute name
    pub name: String,
    /// Declared type
    pub field_type: FieldType,
    /// Whether the server synthesizes a value when the client omits one
    #[serde(default)]
    pub auto_generate: bool,
}

impl Field {
    /// Create a field that must always be supplied by the client
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            auto_generate: false,
        }
    }

    /// Mark this field as auto-generated
    pub fn auto_generated(mut self) -> Self {
        self.auto_generate = true;
        self
    }

    /// Whether the field is flagged for auto-generation
    pub fn is_auto_generated(&self) -> bool {
        self.auto_generate
    }
}

/// Primary index: an ordered, non-empty list of key fields
///
/// Field order defines key order and is fixed for the table's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    name: String,
    fields: Vec<Field>,
}

impl Index {
    /// Name of the implicit primary index
    pub const PRIMARY: &'static str = "pkey";

    /// Build an index, rejecting empty or duplicate field lists
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> StrataResult<Self> {
        let name = name.into();
        if fields.is_empty() {
            return Err(StrataError::invalid_input(format!(
                "index '{}' must have at least one field",
                name
            )));
        }

        let mut seen = HashSet::with_capacity(fields.len());
        for field in &fields {
            if !seen.insert(field.name.as_str()) {
                return Err(StrataError::invalid_input(format!(
                    "index '{}' lists field '{}' more than once",
                    name, field.name
                )));
            }
            if !field.field_type.is_key_type() {
                return Err(StrataError::invalid_input(format!(
                    "field '{}' of type {} cannot be part of index '{}'",
                    field.name, field.field_type, name
                )));
            }
        }

        Ok(Self { name, fields })
    }

    /// Build the primary index
    pub fn primary(fields: Vec<Field>) -> StrataResult<Self> {
        Self::new(Self::PRIMARY, fields)
    }

    /// Index name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in key order
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }
}
