use netric_types::wire::{as_object, flag, opt_i64, opt_id, opt_string, pick};
use serde_json::json;

#[test]
fn pick_returns_first_present_key() {
    let data = json!({"f_system": true, "order_by": []});
    let map = data.as_object().unwrap();
    assert_eq!(pick(map, &["system", "f_system"]), Some(&json!(true)));
    assert_eq!(pick(map, &["missing"]), None);
}

#[test]
fn pick_treats_null_as_present() {
    let data = json!({"name": null, "title": "x"});
    let map = data.as_object().unwrap();
    assert_eq!(pick(map, &["name", "title"]), Some(&json!(null)));
}

#[test]
fn flags_accept_legacy_spellings() {
    assert!(flag(&json!("t")));
    assert!(flag(&json!(1)));
    assert!(flag(&json!(true)));
    assert!(!flag(&json!("f")));
    assert!(!flag(&json!(0)));
    assert!(!flag(&json!(null)));
}

#[test]
fn ids_accept_numbers_and_strings() {
    assert_eq!(opt_id(&json!(12)), Some("12".to_string()));
    assert_eq!(opt_id(&json!("12")), Some("12".to_string()));
    assert_eq!(opt_id(&json!("")), None);
    assert_eq!(opt_id(&json!(null)), None);
}

#[test]
fn integers_accept_numeric_strings() {
    assert_eq!(opt_i64(&json!("25")), Some(25));
    assert_eq!(opt_i64(&json!(25)), Some(25));
    assert_eq!(opt_i64(&json!("abc")), None);
}

#[test]
fn strings_treat_null_as_absent() {
    assert_eq!(opt_string(&json!(null)), None);
    assert_eq!(opt_string(&json!(5)), Some("5".to_string()));
}

#[test]
fn as_object_names_the_payload() {
    let err = as_object(&json!([1, 2]), "definition").unwrap_err();
    assert!(err.to_string().contains("definition"));
}
