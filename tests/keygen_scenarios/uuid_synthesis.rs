//! UUID, string and byte synthesis

use crate::common::*;
use serde_json::{json, Value as JsonValue};
use strata_keygen::{FieldSlot, FieldType};

#[test]
fn empty_document_gets_uuid_in_document_and_fragment() {
    let env = Env::new();
    let index = auto_index("pk", FieldType::Uuid);
    let out = env
        .generator
        .generate(&env.ctx, "users", &index, &doc(json!({})))
        .unwrap();

    let pk = match out.document.field("pk") {
        FieldSlot::Present(JsonValue::String(s)) => s.clone(),
        other => panic!("pk not set: {:?}", other),
    };
    assert!(uuid::Uuid::parse_str(&pk).is_ok());
    assert_eq!(out.response_fragment(), format!(r#"{{"pk":"{}"}}"#, pk));
    assert_eq!(out.document.len(), 1);
    assert!(!out.force_insert);
}

#[test]
fn regenerating_from_original_document_gives_new_values() {
    let env = Env::new();
    let original = doc(json!({"name": "a"}));
    for t in [FieldType::Uuid, FieldType::String, FieldType::Byte] {
        let index = auto_index("pk", t);
        let a = env.generator.generate(&env.ctx, "t", &index, &original).unwrap();
        let b = env.generator.generate(&env.ctx, "t", &index, &original).unwrap();
        assert_ne!(a.document.field("pk"), b.document.field("pk"));
        assert_eq!(a.document.len(), 2);
        assert_eq!(b.document.len(), 2);
    }
    assert_eq!(original.len(), 1);
}

#[test]
fn byte_field_holds_base64_of_sixteen_bytes() {
    use base64::Engine;
    let env = Env::new();
    let out = env
        .generator
        .generate(&env.ctx, "t", &auto_index("b", FieldType::Byte), &doc(json!({})))
        .unwrap();
    let text = match out.document.field("b") {
        FieldSlot::Present(JsonValue::String(s)) => s.clone(),
        other => panic!("b not set: {:?}", other),
    };
    let raw = base64::engine::general_purpose::STANDARD.decode(text).unwrap();
    assert_eq!(raw.len(), 16);
}
