//! Missing, null and zero values are all "absent" for auto-generated fields

use crate::common::*;
use serde_json::{json, Value as JsonValue};
use strata_keygen::{FieldType, ZERO_DATETIME, ZERO_UUID};

fn absent_forms(zero: JsonValue) -> [JsonValue; 3] {
    [json!({}), json!({"k": null}), json!({ "k": zero })]
}

#[test]
fn every_absent_form_is_synthesized() {
    let env = Env::new();
    let cases = [
        (FieldType::String, json!("")),
        (FieldType::Byte, json!("")),
        (FieldType::Uuid, json!(ZERO_UUID)),
        (FieldType::DateTime, json!(ZERO_DATETIME)),
        (FieldType::Int64, json!(0)),
        (FieldType::Int32, json!(0)),
    ];
    for (t, zero) in cases {
        let index = auto_index("k", t);
        for form in absent_forms(zero.clone()) {
            let out = env
                .generator
                .generate(&env.ctx, "t", &index, &doc(form.clone()))
                .unwrap();
            let value = &out.document.as_map()["k"];
            assert!(!value.is_null(), "{} {}", t, form);
            assert_ne!(value, &zero, "{} {} was not replaced", t, form);
        }
    }
}

#[test]
fn int32_absent_forms_consume_consecutive_ids() {
    let env = Env::new();
    let index = auto_index("k", FieldType::Int32);
    let ids: Vec<String> = absent_forms(json!(0))
        .into_iter()
        .map(|form| {
            env.generator
                .generate(&env.ctx, "t", &index, &doc(form))
                .unwrap()
                .response_fragment()
        })
        .collect();
    assert_eq!(ids, [r#"{"k":1}"#, r#"{"k":2}"#, r#"{"k":3}"#]);
}

#[test]
fn supplied_values_are_kept() {
    let env = Env::new();
    let cases = [
        (FieldType::String, json!("abc")),
        (FieldType::Uuid, json!("6f1c1c7e-8a5b-4c1e-9a4e-0b7f3c2d1e00")),
        (FieldType::Int64, json!(-3)),
        (FieldType::Int32, json!(17)),
    ];
    for (t, value) in cases {
        let out = env
            .generator
            .generate(&env.ctx, "t", &auto_index("k", t), &doc(json!({ "k": value.clone() })))
            .unwrap();
        assert_eq!(out.document.as_map()["k"], value);
        assert!(!out.force_insert);
    }
    assert_eq!(env.counter().current("t").unwrap(), 0);
}
