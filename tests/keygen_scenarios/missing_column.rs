//! Error surface for required and malformed key fields

use crate::common::*;
use serde_json::json;
use strata_keygen::{Field, FieldType, Index, StrataError};

#[test]
fn missing_required_integer_names_the_field() {
    let env = Env::new();
    let index = Index::primary(vec![Field::new("id", FieldType::Int64)]).unwrap();
    let err = env
        .generator
        .generate(&env.ctx, "t", &index, &doc(json!({"name": "a"})))
        .unwrap_err();
    assert!(matches!(err, StrataError::MissingKeyColumn { ref field } if field == "id"));
    assert_eq!(err.error_code(), "InvalidArgument");
    assert!(err.to_string().contains("id"));
}

#[test]
fn error_after_counter_allocation_leaves_document_unchanged() {
    let env = Env::new();
    let index = Index::primary(vec![
        Field::new("id", FieldType::Int32).auto_generated(),
        Field::new("region", FieldType::String),
    ])
    .unwrap();
    let original = doc(json!({"name": "a"}));
    let err = env
        .generator
        .generate(&env.ctx, "t", &index, &original)
        .unwrap_err();
    assert!(matches!(err, StrataError::MissingKeyColumn { ref field } if field == "region"));
    assert_eq!(original, doc(json!({"name": "a"})));
    // The id was consumed; ids may have gaps but never repeat
    assert_eq!(env.counter().current("t").unwrap(), 1);
}

#[test]
fn malformed_values_are_invalid_arguments() {
    let env = Env::new();
    let cases = [
        (FieldType::Int32, json!("seven")),
        (FieldType::Int32, json!(1_i64 << 40)),
        (FieldType::Uuid, json!("not-a-uuid")),
        (FieldType::DateTime, json!("tomorrow")),
        (FieldType::Byte, json!("%%%")),
    ];
    for (t, value) in cases {
        let index = Index::primary(vec![Field::new("k", t)]).unwrap();
        let err = env
            .generator
            .generate(&env.ctx, "t", &index, &doc(json!({ "k": value })))
            .unwrap_err();
        assert!(err.is_invalid_argument(), "{}: {}", t, err);
    }
}

#[test]
fn unsupported_auto_generate_type() {
    let env = Env::new();
    let err = env
        .generator
        .generate(&env.ctx, "t", &auto_index("score", FieldType::Double), &doc(json!({})))
        .unwrap_err();
    assert!(matches!(err, StrataError::UnsupportedAutoGenerate { .. }));
    assert!(err.is_invalid_argument());
}
