use lattice::params::Params;
use serde_json::{Value, json};

#[test]
fn test_merge_is_additive() {
    let params = Params::from_iter([("a", json!(1)), ("b", json!(2))]);
    let merged = params.merged([("limit", json!(20)), ("page", json!(1))]);

    assert_eq!(merged.get("a"), Some(&json!(1)));
    assert_eq!(merged.get("b"), Some(&json!(2)));
    assert_eq!(merged.get("limit"), Some(&json!(20)));
    assert_eq!(merged.get("page"), Some(&json!(1)));
}

#[test]
fn test_merge_overwrites_named_keys_only() {
    let params = Params::from_iter([("page", json!(4)), ("search", json!("abc"))]);
    let merged = params.merged([("page", json!(1))]);
    assert_eq!(merged.get("page"), Some(&json!(1)));
    assert_eq!(merged.get("search"), Some(&json!("abc")));
}

#[test]
fn test_null_delta_removes_key() {
    let params = Params::from_iter([("status", json!("open")), ("page", json!(2))]);
    let merged = params.merged([("status", Value::Null)]);
    assert_eq!(merged.get("status"), None);
    assert_eq!(merged.get("page"), Some(&json!(2)));
}

#[test]
fn test_without_omits_key() {
    let params = Params::from_iter([("a", json!(1)), ("b", json!(2))]);
    let narrowed = params.without("a");
    assert_eq!(narrowed.get("a"), None);
    assert_eq!(narrowed.get("b"), Some(&json!(2)));
}

#[test]
fn test_active_detection() {
    let params = Params::from_iter([
        ("text", json!("x")),
        ("empty_text", json!("")),
        ("tags", json!(["a"])),
        ("no_tags", json!([])),
        ("flag", json!(true)),
        ("off_flag", json!(false)),
        ("count", json!(3)),
        ("zero", json!(0)),
    ]);

    assert!(params.is_active("text"));
    assert!(!params.is_active("empty_text"));
    assert!(params.is_active("tags"));
    assert!(!params.is_active("no_tags"));
    assert!(params.is_active("flag"));
    assert!(!params.is_active("off_flag"));
    assert!(params.is_active("count"));
    assert!(!params.is_active("zero"));
    assert!(!params.is_active("missing"));
}

#[test]
fn test_page_and_limit_defaults() {
    let params = Params::new();
    assert_eq!(params.page(), 1);
    assert_eq!(params.limit(), 50);

    // Numeric strings are accepted, the way URL-sourced params arrive.
    let params = Params::from_iter([("page", json!("3")), ("limit", json!("20"))]);
    assert_eq!(params.page(), 3);
    assert_eq!(params.limit(), 20);
}
