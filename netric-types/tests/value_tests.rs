use netric_types::{display_value, is_empty_value, normalize_bool, value_key};
use serde_json::{Value, json};

// ── normalize_bool ───────────────────────────────────────────────

#[test]
fn true_spellings_normalize_to_true() {
    for v in [json!(1), json!("t"), json!("true"), json!(true)] {
        assert_eq!(normalize_bool(v), Value::Bool(true));
    }
}

#[test]
fn false_spellings_normalize_to_false() {
    for v in [json!(0), json!("f"), json!("false"), json!(false)] {
        assert_eq!(normalize_bool(v), Value::Bool(false));
    }
}

#[test]
fn other_values_pass_through() {
    assert_eq!(normalize_bool(json!("yes")), json!("yes"));
    assert_eq!(normalize_bool(json!(2)), json!(2));
    assert_eq!(normalize_bool(Value::Null), Value::Null);
}

// ── display_value / value_key ────────────────────────────────────

#[test]
fn display_renders_scalars() {
    assert_eq!(display_value(&json!("Acme")), "Acme");
    assert_eq!(display_value(&json!(42)), "42");
    assert_eq!(display_value(&json!(true)), "true");
    assert_eq!(display_value(&Value::Null), "");
}

#[test]
fn display_joins_arrays() {
    assert_eq!(display_value(&json!(["a", 2, "c"])), "a, 2, c");
}

#[test]
fn value_key_matches_numbers_and_strings() {
    assert_eq!(value_key(&json!(42)), value_key(&json!("42")));
}

#[test]
fn empty_values() {
    assert!(is_empty_value(&Value::Null));
    assert!(is_empty_value(&json!("")));
    assert!(is_empty_value(&json!([])));
    assert!(!is_empty_value(&json!(0)));
    assert!(!is_empty_value(&json!(false)));
}
