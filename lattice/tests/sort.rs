use lattice::params::Params;
use lattice::widgets::table::{SortOrder, SortState};
use serde_json::{Value, json};

#[test]
fn test_click_cycle_asc_desc_clear() {
    let mut sort = SortState::new();

    sort.cycle("name");
    assert_eq!(sort.sorted(), Some(("name", SortOrder::Asc)));

    sort.cycle("name");
    assert_eq!(sort.sorted(), Some(("name", SortOrder::Desc)));

    let delta = sort.cycle("name");
    assert_eq!(sort.sorted(), None);
    // Cleared state emits nulls so the params merge removes both keys.
    assert_eq!(delta[0].1, Value::Null);
    assert_eq!(delta[1].1, Value::Null);
}

#[test]
fn test_three_clicks_return_to_unsorted() {
    let mut sort = SortState::new();
    sort.cycle("age");
    sort.cycle("age");
    sort.cycle("age");
    assert_eq!(sort.sorted(), None);
}

#[test]
fn test_clicking_other_field_resets_to_ascending() {
    let mut sort = SortState::new();
    sort.cycle("name");
    sort.cycle("name"); // name descending

    let delta = sort.cycle("age");
    assert_eq!(sort.sorted(), Some(("age", SortOrder::Asc)));
    assert_eq!(delta[0].1, json!("age"));
    assert_eq!(delta[1].1, json!("asc"));
}

#[test]
fn test_derives_from_params() {
    let params = Params::from_iter([
        ("sortField", json!("name")),
        ("sortOrder", json!("desc")),
    ]);
    let sort = SortState::from_params(&params);
    assert_eq!(sort.sorted(), Some(("name", SortOrder::Desc)));
    assert_eq!(sort.order_for("name"), Some(SortOrder::Desc));
    assert_eq!(sort.order_for("age"), None);
}

#[test]
fn test_unknown_order_defaults_to_ascending() {
    let params = Params::from_iter([
        ("sortField", json!("name")),
        ("sortOrder", json!("sideways")),
    ]);
    let sort = SortState::from_params(&params);
    assert_eq!(sort.sorted(), Some(("name", SortOrder::Asc)));
}

#[test]
fn test_missing_field_means_unsorted() {
    let params = Params::from_iter([("sortOrder", json!("desc"))]);
    let sort = SortState::from_params(&params);
    assert_eq!(sort.sorted(), None);
}
