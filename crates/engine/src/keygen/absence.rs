//! Null/zero detection for auto-generated key fields
//!
//! A client may leave an auto-generated field out, send `null`, or send the
//! type's zero value. All three mean "generate one for me".

use serde_json::Value as JsonValue;
use std::borrow::Cow;
use strata_core::{parse_datetime, FieldType};

/// Zero sentinel for int32/int64 fields
pub const ZERO_INT: &str = "0";

/// Textual form of the all-zero UUID
pub const ZERO_UUID: &str = "00000000-0000-0000-0000-000000000000";

/// Zero-time sentinel for datetime fields (0001-01-01, UTC)
pub const ZERO_DATETIME: &str = "0001-01-01T00:00:00Z";

/// Whether `raw` is the zero value of `field_type`
///
/// `raw` is the unquoted text of the supplied value (see [`raw_text`]).
/// Types with no zero sentinel are never absent.
pub fn is_absent(field_type: FieldType, raw: &str) -> bool {
    match field_type {
        FieldType::String | FieldType::Byte => raw.is_empty(),
        FieldType::Uuid => raw.eq_ignore_ascii_case(ZERO_UUID),
        FieldType::DateTime => raw == ZERO_DATETIME || is_zero_instant(raw),
        FieldType::Int64 | FieldType::Int32 => raw == ZERO_INT,
        FieldType::Double | FieldType::Bool | FieldType::Array | FieldType::Object => false,
    }
}

// Other spellings of the zero instant, e.g. "0001-01-01T00:00:00.000000000Z"
fn is_zero_instant(raw: &str) -> bool {
    match (parse_datetime(raw), parse_datetime(ZERO_DATETIME)) {
        (Some(dt), Some(zero)) => dt == zero,
        _ => false,
    }
}

/// Unquoted text of a JSON value: string contents, or the JSON encoding otherwise
pub fn raw_text(value: &JsonValue) -> Cow<'_, str> {
    match value {
        JsonValue::String(s) => Cow::Borrowed(s.as_str()),
        other => Cow::Owned(other.to_string()),
    }
}
