//! Schema-typed key values
//!
//! A [`TypedValue`] is produced once per key field per write, either parsed
//! from the client's document or synthesized by the key generator, and is
//! consumed immediately by key encoding and response building.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::error::{StrataError, StrataResult};
use crate::schema::{Field, FieldType};
use crate::value::Value;

/// Format a timestamp the way key fields carry it: RFC 3339, UTC, nanoseconds
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Parse an RFC 3339 timestamp and normalize it to UTC
pub fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// A key value tagged with its field type
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    /// `string` field
    String(String),
    /// `uuid` field
    Uuid(Uuid),
    /// `byte` field (raw bytes; base64 in JSON)
    Bytes(Vec<u8>),
    /// `datetime` field
    DateTime(DateTime<Utc>),
    /// `int64` field
    Int64(i64),
    /// `int32` field
    Int32(i32),
    /// `double` field
    Double(f64),
    /// `bool` field
    Bool(bool),
}

impl TypedValue {
    /// The field type this value belongs to
    pub fn field_type(&self) -> FieldType {
        match self {
            TypedValue::String(_) => FieldType::String,
            TypedValue::Uuid(_) => FieldType::Uuid,
            TypedValue::Bytes(_) => FieldType::Byte,
            TypedValue::DateTime(_) => FieldType::DateTime,
            TypedValue::Int64(_) => FieldType::Int64,
            TypedValue::Int32(_) => FieldType::Int32,
            TypedValue::Double(_) => FieldType::Double,
            TypedValue::Bool(_) => FieldType::Bool,
        }
    }

    /// Parse a client-supplied JSON value according to the field's declared type
    ///
    /// # Errors
    /// `MalformedValue` naming the field if the JSON value does not match the type.
    pub fn parse(field: &Field, json: &JsonValue) -> StrataResult<Self> {
        let malformed = |reason: String| StrataError::malformed(&field.name, reason);
        let expect_str = || {
            json.as_str()
                .ok_or_else(|| malformed(format!("expected a {} string", field.field_type)))
        };

        match field.field_type {
            FieldType::String => Ok(TypedValue::String(expect_str()?.to_string())),
            FieldType::Uuid => Uuid::parse_str(expect_str()?)
                .map(TypedValue::Uuid)
                .map_err(|e| malformed(format!("invalid uuid: {}", e))),
            FieldType::Byte => BASE64
                .decode(expect_str()?)
                .map(TypedValue::Bytes)
                .map_err(|e| malformed(format!("invalid base64: {}", e))),
            FieldType::DateTime => {
                let s = expect_str()?;
                parse_datetime(s)
                    .map(TypedValue::DateTime)
                    .ok_or_else(|| malformed(format!("invalid RFC 3339 timestamp '{}'", s)))
            }
            FieldType::Int64 => json
                .as_i64()
                .map(TypedValue::Int64)
                .ok_or_else(|| malformed(format!("expected an int64, got {}", json))),
            FieldType::Int32 => json
                .as_i64()
                .and_then(|i| i32::try_from(i).ok())
                .map(TypedValue::Int32)
                .ok_or_else(|| malformed(format!("expected an int32, got {}", json))),
            FieldType::Double => json
                .as_f64()
                .map(TypedValue::Double)
                .ok_or_else(|| malformed(format!("expected a double, got {}", json))),
            FieldType::Bool => json
                .as_bool()
                .map(TypedValue::Bool)
                .ok_or_else(|| malformed(format!("expected a bool, got {}", json))),
            FieldType::Array | FieldType::Object => Err(malformed(format!(
                "type {} cannot be used as a key",
                field.field_type
            ))),
        }
    }

    /// Unquoted textual form, as spliced into documents and responses
    pub fn display(&self) -> String {
        match self {
            TypedValue::String(s) => s.clone(),
            TypedValue::Uuid(u) => u.to_string(),
            TypedValue::Bytes(b) => BASE64.encode(b),
            TypedValue::DateTime(dt) => format_datetime(dt),
            TypedValue::Int64(i) => i.to_string(),
            TypedValue::Int32(i) => i.to_string(),
            TypedValue::Double(f) => f.to_string(),
            TypedValue::Bool(b) => b.to_string(),
        }
    }

    /// JSON form of the value, quoted for string-like types
    pub fn to_json(&self) -> JsonValue {
        match self {
            TypedValue::Int64(i) => JsonValue::from(*i),
            TypedValue::Int32(i) => JsonValue::from(*i),
            TypedValue::Double(f) => serde_json::Number::from_f64(*f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            TypedValue::Bool(b) => JsonValue::Bool(*b),
            TypedValue::String(_)
            | TypedValue::Uuid(_)
            | TypedValue::Bytes(_)
            | TypedValue::DateTime(_) => JsonValue::String(self.display()),
        }
    }

    /// Lower into the untyped form handed to the key encoder
    pub fn into_value(self) -> Value {
        match self {
            TypedValue::String(s) => Value::String(s),
            TypedValue::Uuid(u) => Value::String(u.to_string()),
            TypedValue::Bytes(b) => Value::Bytes(b),
            TypedValue::DateTime(dt) => Value::String(format_datetime(&dt)),
            TypedValue::Int64(i) => Value::Int(i),
            TypedValue::Int32(i) => Value::Int(i as i64),
            TypedValue::Double(f) => Value::Float(f),
            TypedValue::Bool(b) => Value::Bool(b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field(t: FieldType) -> Field {
        Field::new("k", t)
    }

    #[test]
    fn test_parse_each_key_type() {
        let u = Uuid::new_v4();
        assert_eq!(
            TypedValue::parse(&field(FieldType::Uuid), &json!(u.to_string())).unwrap(),
            TypedValue::Uuid(u)
        );
        assert_eq!(
            TypedValue::parse(&field(FieldType::Byte), &json!("AQID")).unwrap(),
            TypedValue::Bytes(vec![1, 2, 3])
        );
        assert_eq!(
            TypedValue::parse(&field(FieldType::Int64), &json!(-5)).unwrap(),
            TypedValue::Int64(-5)
        );
        assert_eq!(
            TypedValue::parse(&field(FieldType::Int32), &json!(42)).unwrap(),
            TypedValue::Int32(42)
        );
        assert_eq!(
            TypedValue::parse(&field(FieldType::String), &json!("abc")).unwrap(),
            TypedValue::String("abc".to_string())
        );
        let dt = TypedValue::parse(&field(FieldType::DateTime), &json!("2024-03-01T10:00:00+02:00"))
            .unwrap();
        assert_eq!(dt.display(), "2024-03-01T08:00:00.000000000Z");
    }

    #[test]
    fn test_parse_rejects_wrong_json_shape() {
        let err = TypedValue::parse(&field(FieldType::Int64), &json!("12")).unwrap_err();
        assert!(matches!(err, StrataError::MalformedValue { ref field, .. } if field == "k"));

        assert!(TypedValue::parse(&field(FieldType::String), &json!(12)).is_err());
        assert!(TypedValue::parse(&field(FieldType::Uuid), &json!("not-a-uuid")).is_err());
        assert!(TypedValue::parse(&field(FieldType::Byte), &json!("***")).is_err());
        assert!(TypedValue::parse(&field(FieldType::DateTime), &json!("yesterday")).is_err());
        assert!(TypedValue::parse(&field(FieldType::Int64), &json!(1.5)).is_err());
    }

    #[test]
    fn test_parse_int32_range() {
        let f = field(FieldType::Int32);
        assert!(TypedValue::parse(&f, &json!(i32::MAX)).is_ok());
        assert!(TypedValue::parse(&f, &json!(i64::from(i32::MAX) + 1)).is_err());
    }

    #[test]
    fn test_to_json_quotes_string_like_types() {
        assert_eq!(TypedValue::Int32(7).to_json(), json!(7));
        assert_eq!(TypedValue::Bytes(vec![1, 2, 3]).to_json(), json!("AQID"));
        assert_eq!(TypedValue::String("x".into()).to_json(), json!("x"));
    }

    #[test]
    fn test_into_value() {
        assert_eq!(TypedValue::Int32(9).into_value(), Value::Int(9));
        assert_eq!(TypedValue::Bytes(vec![9]).into_value(), Value::Bytes(vec![9]));
        let u = Uuid::nil();
        assert_eq!(TypedValue::Uuid(u).into_value(), Value::String(u.to_string()));
    }

    #[test]
    fn test_field_type_matches_variant() {
        assert_eq!(TypedValue::Int32(1).field_type(), FieldType::Int32);
        assert_eq!(TypedValue::Bytes(vec![]).field_type(), FieldType::Byte);
        assert_eq!(TypedValue::DateTime(Utc::now()).field_type(), FieldType::DateTime);
    }
}
