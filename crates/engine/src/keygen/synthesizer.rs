//! Fresh values for auto-generated key fields
//!
//! | Type | Value |
//! |---|---|
//! | string, uuid | random v4 UUID, canonical text |
//! | byte | the 16 raw bytes of a random v4 UUID (base64 in JSON) |
//! | datetime | current UTC time, nanosecond precision |
//! | int64 | current UTC time as nanoseconds since the epoch |
//! | int32 | next value of the table's counter |
//!
//! Only int32 values are guaranteed unique. Timestamp-based values are
//! best-effort, which is why the key generator forces insert-only writes
//! for them.

use chrono::Utc;
use uuid::Uuid;

use strata_core::{Field, FieldType, StrataError, StrataResult, TypedValue};

use super::counter::CounterAllocator;
use crate::context::RequestContext;

/// A synthesized value and its unquoted display text
#[derive(Debug, Clone, PartialEq)]
pub struct Synthesized {
    /// Unquoted text spliced into the document and response
    pub display: String,
    /// The typed value
    pub value: TypedValue,
}

impl From<TypedValue> for Synthesized {
    fn from(value: TypedValue) -> Self {
        Self {
            display: value.display(),
            value,
        }
    }
}

/// Produces values for auto-generated fields
#[derive(Debug, Clone)]
pub struct ValueSynthesizer {
    counter: CounterAllocator,
}

impl ValueSynthesizer {
    /// Synthesizer that allocates int32 ids from `counter`
    pub fn new(counter: CounterAllocator) -> Self {
        Self { counter }
    }

    /// The counter used for int32 fields
    pub fn counter(&self) -> &CounterAllocator {
        &self.counter
    }

    /// Generate a value for `field` of `table`
    ///
    /// # Errors
    /// `UnsupportedAutoGenerate` for types without a rule; counter errors
    /// for int32 fields.
    pub fn synthesize(
        &self,
        ctx: &RequestContext,
        table: &str,
        field: &Field,
    ) -> StrataResult<Synthesized> {
        let value = match field.field_type {
            FieldType::String => TypedValue::String(Uuid::new_v4().to_string()),
            FieldType::Uuid => TypedValue::Uuid(Uuid::new_v4()),
            FieldType::Byte => TypedValue::Bytes(Uuid::new_v4().as_bytes().to_vec()),
            FieldType::DateTime => TypedValue::DateTime(Utc::now()),
            FieldType::Int64 => {
                let nanos = Utc::now().timestamp_nanos_opt().ok_or_else(|| {
                    StrataError::internal("current time does not fit in i64 nanoseconds")
                })?;
                TypedValue::Int64(nanos)
            }
            FieldType::Int32 => TypedValue::Int32(self.counter.allocate(ctx, table)?),
            FieldType::Double | FieldType::Bool | FieldType::Array | FieldType::Object => {
                return Err(StrataError::UnsupportedAutoGenerate {
                    field: field.name.clone(),
                    field_type: field.field_type,
                })
            }
        };
        Ok(value.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{Database, RetryConfig};
    use std::sync::Arc;

    fn synthesizer() -> ValueSynthesizer {
        let db = Arc::new(Database::new());
        ValueSynthesizer::new(CounterAllocator::new(db, RetryConfig::new()))
    }

    fn synth(t: FieldType) -> StrataResult<Synthesized> {
        synthesizer().synthesize(&RequestContext::new(), "t", &Field::new("k", t).auto_generated())
    }

    #[test]
    fn test_uuid_and_string_are_canonical_uuids() {
        let s = synth(FieldType::Uuid).unwrap();
        assert!(matches!(s.value, TypedValue::Uuid(_)));
        assert_eq!(Uuid::parse_str(&s.display).unwrap().to_string(), s.display);

        let s = synth(FieldType::String).unwrap();
        assert!(Uuid::parse_str(&s.display).is_ok());
        assert_eq!(s.value, TypedValue::String(s.display.clone()));
    }

    #[test]
    fn test_bytes_are_sixteen_random_bytes() {
        let s = synth(FieldType::Byte).unwrap();
        match &s.value {
            TypedValue::Bytes(b) => assert_eq!(b.len(), 16),
            other => panic!("expected bytes, got {:?}", other),
        }
        // 16 bytes → 24 base64 chars with padding
        assert_eq!(s.display.len(), 24);
    }

    #[test]
    fn test_datetime_has_nanosecond_precision() {
        let s = synth(FieldType::DateTime).unwrap();
        assert!(s.display.ends_with('Z'));
        let fraction = s.display.split('.').nth(1).unwrap();
        assert_eq!(fraction.len(), "000000000Z".len());
    }

    #[test]
    fn test_int64_is_current_nanos() {
        let before = Utc::now().timestamp_nanos_opt().unwrap();
        let s = synth(FieldType::Int64).unwrap();
        let after = Utc::now().timestamp_nanos_opt().unwrap();
        match s.value {
            TypedValue::Int64(n) => assert!(before <= n && n <= after),
            other => panic!("expected int64, got {:?}", other),
        }
    }

    #[test]
    fn test_int32_comes_from_counter() {
        let synthesizer = synthesizer();
        let ctx = RequestContext::new();
        let field = Field::new("id", FieldType::Int32).auto_generated();
        let first = synthesizer.synthesize(&ctx, "orders", &field).unwrap();
        let second = synthesizer.synthesize(&ctx, "orders", &field).unwrap();
        assert_eq!(first.value, TypedValue::Int32(1));
        assert_eq!(second.display, "2");
        assert_eq!(synthesizer.counter().current("orders").unwrap(), 2);
    }

    #[test]
    fn test_unsupported_types() {
        for t in [FieldType::Double, FieldType::Bool, FieldType::Array, FieldType::Object] {
            let err = synth(t).unwrap_err();
            assert!(err.is_invalid_argument());
            assert!(matches!(
                err,
                StrataError::UnsupportedAutoGenerate { ref field, field_type }
                    if field == "k" && field_type == t
            ));
        }
    }

    #[test]
    fn test_two_uuids_differ() {
        let s = synthesizer();
        let ctx = RequestContext::new();
        let field = Field::new("pk", FieldType::Uuid).auto_generated();
        assert_ne!(
            s.synthesize(&ctx, "t", &field).unwrap(),
            s.synthesize(&ctx, "t", &field).unwrap()
        );
    }
}
