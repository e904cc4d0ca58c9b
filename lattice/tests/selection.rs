use lattice::widgets::selection::{RowKey, Selection, TriState};

fn keys(ids: &[&str]) -> Vec<RowKey> {
    ids.iter().map(|id| RowKey::from(*id)).collect()
}

#[test]
fn test_select_all_unions_with_offpage_keys() {
    let mut selection = Selection::new();
    // Keys selected on a previous page.
    selection.select_one(RowKey::from("a"), true);
    selection.select_one(RowKey::from("b"), true);

    let page = keys(&["x", "y", "z"]);
    selection.select_all_on_page(&page, true);

    assert_eq!(selection.selected(), keys(&["a", "b", "x", "y", "z"]));
}

#[test]
fn test_deselect_all_removes_exactly_page_keys() {
    let mut selection = Selection::new();
    selection.select_one(RowKey::from("a"), true);
    let page = keys(&["x", "y", "z"]);
    selection.select_all_on_page(&page, true);

    selection.select_all_on_page(&page, false);

    assert_eq!(selection.selected(), keys(&["a"]));
}

#[test]
fn test_union_subtract_independent_of_prior_order() {
    let page = keys(&["p1", "p2"]);

    let mut forward = Selection::new();
    forward.select_one(RowKey::from("s1"), true);
    forward.select_one(RowKey::from("s2"), true);
    forward.select_all_on_page(&page, true);

    let mut reversed = Selection::new();
    reversed.select_all_on_page(&page, true);
    reversed.select_one(RowKey::from("s2"), true);
    reversed.select_one(RowKey::from("s1"), true);

    assert_eq!(forward.selected(), reversed.selected());

    forward.select_all_on_page(&page, false);
    reversed.select_all_on_page(&page, false);
    assert_eq!(forward.selected(), keys(&["s1", "s2"]));
    assert_eq!(reversed.selected(), keys(&["s1", "s2"]));
}

#[test]
fn test_select_one_add_and_remove() {
    let mut selection = Selection::new();
    assert!(selection.select_one(RowKey::from("a"), true));
    assert!(selection.is_selected(&RowKey::from("a")));

    // Re-adding is a no-op.
    assert!(!selection.select_one(RowKey::from("a"), true));

    assert!(selection.select_one(RowKey::from("a"), false));
    assert!(!selection.is_selected(&RowKey::from("a")));
    assert!(selection.is_empty());
}

#[test]
fn test_page_state_tristate() {
    let mut selection = Selection::new();
    let page = keys(&["1", "2", "3"]);

    assert_eq!(selection.page_state(&page), TriState::Unchecked);

    selection.select_one(RowKey::from("2"), true);
    assert_eq!(selection.page_state(&page), TriState::Indeterminate);

    selection.select_all_on_page(&page, true);
    assert_eq!(selection.page_state(&page), TriState::Checked);

    // Off-page selections do not affect the page summary.
    let mut other = Selection::new();
    other.select_one(RowKey::from("elsewhere"), true);
    assert_eq!(other.page_state(&page), TriState::Unchecked);
}

#[test]
fn test_sync_replaces_set_and_reports_difference() {
    let mut selection = Selection::new();
    selection.select_one(RowKey::from("a"), true);

    // Same contents: no change reported.
    assert!(!selection.sync(&keys(&["a"])));

    // Different contents: replaced exactly.
    assert!(selection.sync(&keys(&["b", "c"])));
    assert_eq!(selection.selected(), keys(&["b", "c"]));
}

#[test]
fn test_row_key_value_equality() {
    use serde_json::json;

    // Equal values compare equal regardless of origin.
    let a = RowKey::from_value(&json!("7")).unwrap();
    let b = RowKey::from_value(&json!("7")).unwrap();
    assert_eq!(a, b);

    // A numeric 7 and the string "7" are distinct keys.
    let n = RowKey::from_value(&json!(7)).unwrap();
    assert_ne!(a, n);

    // Objects cannot be keys.
    assert!(RowKey::from_value(&json!({"id": 1})).is_none());
}
