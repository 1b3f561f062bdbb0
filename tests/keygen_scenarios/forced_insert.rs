//! Insert-only semantics for timestamp-based keys

use crate::common::*;
use serde_json::json;
use strata_keygen::{Field, FieldType, Index, StrataError};

#[test]
fn int64_synthesis_marks_insert_only() {
    let env = Env::new();
    let out = env
        .generator
        .generate(&env.ctx, "events", &auto_index("id", FieldType::Int64), &doc(json!({})))
        .unwrap();
    assert!(out.force_insert);
}

#[test]
fn datetime_synthesis_marks_insert_only_and_uses_nanos() {
    let env = Env::new();
    let out = env
        .generator
        .generate(&env.ctx, "events", &auto_index("at", FieldType::DateTime), &doc(json!({})))
        .unwrap();
    assert!(out.force_insert);
    let at = out.document.as_map()["at"].as_str().unwrap().to_string();
    let parsed = chrono::DateTime::parse_from_rfc3339(&at).unwrap();
    assert_eq!(parsed.offset().local_minus_utc(), 0);
    assert_eq!(at.split('.').nth(1).unwrap().len(), 10);
}

#[test]
fn counter_and_uuid_do_not_force_insert() {
    let env = Env::new();
    for t in [FieldType::Int32, FieldType::Uuid, FieldType::String, FieldType::Byte] {
        let out = env
            .generator
            .generate(&env.ctx, "t", &auto_index("id", t), &doc(json!({})))
            .unwrap();
        assert!(!out.force_insert, "{} should not force insert", t);
    }
}

#[test]
fn mixed_index_forces_insert_if_any_field_is_timestamp_based() {
    let env = Env::new();
    let index = Index::primary(vec![
        Field::new("pk", FieldType::Uuid).auto_generated(),
        Field::new("at", FieldType::DateTime).auto_generated(),
    ])
    .unwrap();
    let out = env
        .generator
        .generate(&env.ctx, "t", &index, &doc(json!({})))
        .unwrap();
    assert!(out.force_insert);
}

#[test]
fn replace_with_forced_insert_never_overwrites() {
    let env = Env::new();
    let writer = env.writer();
    let index = Index::primary(vec![
        Field::new("tenant", FieldType::String),
        Field::new("id", FieldType::Int64).auto_generated(),
    ])
    .unwrap();

    let first = writer
        .replace(&env.ctx, "t", &index, &doc(json!({"tenant": "a", "v": 1})))
        .unwrap();
    assert!(first.forced_insert);

    // A client supplying the same key explicitly is still an ordinary replace
    let id = first.document.as_map()["id"].clone();
    let again = writer
        .replace(&env.ctx, "t", &index, &doc(json!({"tenant": "a", "id": id.clone(), "v": 2})))
        .unwrap();
    assert!(!again.forced_insert);
    assert_eq!(again.key, first.key);

    // ...while an insert of it is rejected
    let err = writer
        .insert(&env.ctx, "t", &index, &doc(json!({"tenant": "a", "id": id})))
        .unwrap_err();
    assert!(matches!(err, StrataError::DuplicateKey { .. }));
}
