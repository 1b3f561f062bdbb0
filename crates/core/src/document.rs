//! Client documents on the write path
//!
//! A [`Document`] is the JSON object submitted with an insert or replace.
//! Updates are expressed as pure transformations (`with_field`) so a caller
//! never observes a half-updated document.
//!
//! Attribute order and the literal text of numbers survive a rewrite: an
//! existing attribute is replaced where it stands, a new one is appended,
//! and nothing else changes byte-wise.

use serde_json::{Map, Value as JsonValue};
use std::fmt;

use crate::error::{StrataError, StrataResult};

/// What a document holds for a given attribute
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldSlot<'a> {
    /// The attribute is absent
    Missing,
    /// The attribute is present with an explicit `null`
    Null,
    /// The attribute is present with a value
    Present(&'a JsonValue),
}

/// A JSON object document
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    fields: Map<String, JsonValue>,
}

impl Document {
    /// An empty document (`{}`)
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a document from raw JSON bytes
    ///
    /// # Errors
    /// `InvalidInput` if the bytes are not JSON or not a JSON object.
    pub fn parse(bytes: &[u8]) -> StrataResult<Self> {
        let value: JsonValue = serde_json::from_slice(bytes)?;
        Self::from_json(value)
    }

    /// Wrap an already-parsed JSON value
    pub fn from_json(value: JsonValue) -> StrataResult<Self> {
        match value {
            JsonValue::Object(fields) => Ok(Self { fields }),
            other => Err(StrataError::invalid_input(format!(
                "document must be a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Look up a top-level attribute
    pub fn field(&self, name: &str) -> FieldSlot<'_> {
        match self.fields.get(name) {
            None => FieldSlot::Missing,
            Some(JsonValue::Null) => FieldSlot::Null,
            Some(v) => FieldSlot::Present(v),
        }
    }

    /// Return a copy of this document with `name` set to `value`
    pub fn with_field(&self, name: impl Into<String>, value: JsonValue) -> Self {
        let mut fields = self.fields.clone();
        fields.insert(name.into(), value);
        Self { fields }
    }

    /// Return a copy with every patch applied in order
    pub fn with_fields<I>(&self, patches: I) -> Self
    where
        I: IntoIterator<Item = (String, JsonValue)>,
    {
        let mut fields = self.fields.clone();
        fields.extend(patches);
        Self { fields }
    }

    /// Number of top-level attributes
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True for `{}`
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Borrow as a JSON map
    pub fn as_map(&self) -> &Map<String, JsonValue> {
        &self.fields
    }

    /// Convert into a JSON value
    pub fn into_json(self) -> JsonValue {
        JsonValue::Object(self.fields)
    }

    /// Serialize to compact JSON bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        // A map of JSON values always serializes.
        serde_json::to_vec(&self.fields).unwrap_or_default()
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = serde_json::to_string(&self.fields).map_err(|_| fmt::Error)?;
        f.write_str(&s)
    }
}

fn json_kind(v: &JsonValue) -> &'static str {
    match v {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_rejects_non_objects() {
        assert!(Document::parse(b"[1,2]").is_err());
        assert!(Document::parse(b"\"x\"").is_err());
        assert!(Document::parse(b"{broken").is_err());
        assert!(Document::parse(b"{}").unwrap().is_empty());
    }

    #[test]
    fn test_field_slots() {
        let doc = Document::parse(br#"{"a":null,"b":0}"#).unwrap();
        assert_eq!(doc.field("a"), FieldSlot::Null);
        assert_eq!(doc.field("b"), FieldSlot::Present(&json!(0)));
        assert_eq!(doc.field("c"), FieldSlot::Missing);
    }

    #[test]
    fn test_with_field_leaves_original_untouched() {
        let original = Document::parse(br#"{"name":"a"}"#).unwrap();
        let updated = original.with_field("id", json!(7));
        assert_eq!(original.len(), 1);
        assert_eq!(updated.len(), 2);
        assert_eq!(updated.field("id"), FieldSlot::Present(&json!(7)));
    }

    #[test]
    fn test_with_fields_overwrites_null() {
        let doc = Document::parse(br#"{"id":null}"#).unwrap();
        let updated = doc.with_fields(vec![("id".to_string(), json!(1))]);
        assert_eq!(updated.into_json(), json!({"id": 1}));
    }

    #[test]
    fn test_rewrite_keeps_order_and_number_text() {
        let raw = br#"{"zeta":1,"id":null,"alpha":2,"big":123456789012345678901234567890,"amount":1.10}"#;
        let doc = Document::parse(raw).unwrap();
        assert_eq!(doc.to_bytes(), raw.to_vec());

        let patched = doc.with_field("id", json!(7)).with_field("added", json!("x"));
        assert_eq!(
            String::from_utf8(patched.to_bytes()).unwrap(),
            r#"{"zeta":1,"id":7,"alpha":2,"big":123456789012345678901234567890,"amount":1.10,"added":"x"}"#
        );
    }

    #[test]
    fn test_bytes_roundtrip() {
        let doc = Document::from_json(json!({"k": "v", "n": 1})).unwrap();
        assert_eq!(Document::parse(&doc.to_bytes()).unwrap(), doc);
    }
}
