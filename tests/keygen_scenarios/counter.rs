//! Counter allocation: sequential scenario and persistence

use crate::common::*;
use strata_keygen::{counter_key, FieldType, Value};

#[test]
fn three_sequential_allocations_return_one_two_three() {
    let env = Env::new();
    let counter = env.counter();

    assert_eq!(counter.allocate(&env.ctx, "orders").unwrap(), 1);
    assert_eq!(counter.allocate(&env.ctx, "orders").unwrap(), 2);
    assert_eq!(counter.allocate(&env.ctx, "orders").unwrap(), 3);
    assert_eq!(counter.current("orders").unwrap(), 3);
}

#[test]
fn persisted_value_tracks_last_allocation() {
    let env = Env::new();
    let counter = env.counter();
    for expected in 1..=10 {
        let v = counter.allocate(&env.ctx, "orders").unwrap();
        assert_eq!(v, expected);
        assert_eq!(
            env.db.get(&counter_key("orders")).unwrap(),
            Some(Value::Bytes((expected as u32).to_be_bytes().to_vec()))
        );
    }
}

#[test]
fn generated_int32_documents_follow_counter() {
    let env = Env::new();
    let index = auto_index("id", FieldType::Int32);
    let original = doc(serde_json::json!({"item": "x"}));

    let first = env.generator.generate(&env.ctx, "orders", &index, &original).unwrap();
    let second = env.generator.generate(&env.ctx, "orders", &index, &original).unwrap();

    assert_eq!(first.response_fragment(), r#"{"id":1}"#);
    assert_eq!(second.response_fragment(), r#"{"id":2}"#);
    assert_ne!(first.key, second.key);
}

#[test]
fn counter_record_is_outside_user_data() {
    let env = Env::new();
    let writer = env.writer();
    let index = auto_index("id", FieldType::Int32);
    let written = writer
        .insert(&env.ctx, "orders", &index, &doc(serde_json::json!({})))
        .unwrap();
    assert_ne!(written.key.subspace, counter_key("orders").subspace);
}
