use lattice::params::Params;
use lattice::widgets::filters::{AppliedFilters, Filter, FilterPanel, SearchBox, any_active};
use lattice::widgets::select::SelectOption;
use serde_json::json;

fn tag_filters() -> Vec<Filter> {
    vec![
        Filter::new("tags", "Tags")
            .options(vec![
                SelectOption::new("x", "Tag X"),
                SelectOption::new("y", "Tag Y"),
                SelectOption::new("z", "Tag Z"),
            ])
            .multi(),
        Filter::new("status", "Status").options(vec![
            SelectOption::new("open", "Open"),
            SelectOption::new("closed", "Closed"),
        ]),
        Filter::new("owner", "Owner"),
    ]
}

#[test]
fn test_chip_per_array_element() {
    let applied = AppliedFilters::new(tag_filters());
    let params = Params::from_iter([("tags", json!(["x", "y"]))]);

    let chips = applied.chips(&params);
    assert_eq!(chips.len(), 2);
    assert_eq!(chips[0].label, "Tag X");
    assert_eq!(chips[1].label, "Tag Y");
}

#[test]
fn test_removing_array_chip_keeps_other_values() {
    let applied = AppliedFilters::new(tag_filters());
    let params = Params::from_iter([("tags", json!(["x", "y", "z"]))]);

    let chips = applied.chips(&params);
    let y_chip = chips.iter().find(|chip| chip.value == json!("y")).unwrap();
    let merged = applied.without_chip(&params, y_chip);

    assert_eq!(merged.get("tags"), Some(&json!(["x", "z"])));
}

#[test]
fn test_removing_only_scalar_chip_drops_key() {
    let applied = AppliedFilters::new(tag_filters());
    let params = Params::from_iter([("status", json!("open")), ("page", json!(3))]);

    let chips = applied.chips(&params);
    assert_eq!(chips.len(), 1);
    assert_eq!(chips[0].label, "Open");

    let merged = applied.without_chip(&params, &chips[0]);
    assert_eq!(merged.get("status"), None);
    // Unrelated keys survive the removal.
    assert_eq!(merged.get("page"), Some(&json!(3)));
}

#[test]
fn test_chip_label_falls_back_to_raw_value() {
    let applied = AppliedFilters::new(tag_filters());
    let params = Params::from_iter([("tags", json!(["unmapped"]))]);

    let chips = applied.chips(&params);
    assert_eq!(chips[0].label, "unmapped");
}

#[test]
fn test_unknown_params_produce_no_chips() {
    let applied = AppliedFilters::new(tag_filters());
    let params = Params::from_iter([("page", json!(2)), ("search", json!("abc"))]);
    assert!(applied.chips(&params).is_empty());
}

#[test]
fn test_any_active_checks_scalars_and_arrays() {
    let filters = tag_filters();

    assert!(!any_active(&filters, &Params::new()));
    assert!(!any_active(
        &filters,
        &Params::from_iter([("tags", json!([]))])
    ));
    assert!(any_active(
        &filters,
        &Params::from_iter([("tags", json!(["x"]))])
    ));
    assert!(any_active(
        &filters,
        &Params::from_iter([("owner", json!("sam"))])
    ));
    // Params outside the filter set do not count.
    assert!(!any_active(
        &filters,
        &Params::from_iter([("search", json!("abc"))])
    ));
}

#[test]
fn test_panel_apply_emits_form_values_and_first_page() {
    let mut panel = FilterPanel::new(tag_filters());
    let params = Params::from_iter([("tags", json!(["x"])), ("owner", json!("sam"))]);
    panel.open(&params);

    let delta = panel.apply_delta();
    assert_eq!(delta.get("tags"), Some(&json!(["x"])));
    assert_eq!(delta.get("owner"), Some(&json!("sam")));
    // Unset filters emit null so the merge drops any stale value; apply
    // always returns to the first page.
    assert_eq!(delta.get("status"), Some(&json!(null)));
    assert_eq!(delta.get("page"), Some(&json!(1)));

    let merged = Params::from_iter([("status", json!("open"))]).merged(delta);
    assert_eq!(merged.get("status"), None);
}

#[test]
fn test_panel_reset_nulls_every_filter_name() {
    let mut panel = FilterPanel::new(tag_filters());
    panel.open(&Params::from_iter([("tags", json!(["x"]))]));

    let reset = panel.reset_delta();
    let params = Params::from_iter([
        ("tags", json!(["x"])),
        ("status", json!("open")),
        ("search", json!("abc")),
    ]);
    let merged = params.merged(reset);

    assert_eq!(merged.get("tags"), None);
    assert_eq!(merged.get("status"), None);
    // Non-filter keys are untouched.
    assert_eq!(merged.get("search"), Some(&json!("abc")));
}

#[test]
fn test_panel_coerces_scalar_param_for_multi_filter() {
    let mut panel = FilterPanel::new(tag_filters());
    // A multi filter hydrated from a scalar param gets a one-element list.
    panel.open(&Params::from_iter([("tags", json!("x"))]));

    let delta = panel.apply_delta();
    assert_eq!(delta.get("tags"), Some(&json!(["x"])));
}

#[test]
fn test_search_submit_trims_and_resets_page() {
    let mut search = SearchBox::new();
    search.sync_from_params(&Params::from_iter([("search", json!("  hello  "))]));

    let delta = search.submit_delta();
    assert_eq!(delta.get("search"), Some(&json!("hello")));
    assert_eq!(delta.get("page"), Some(&json!(1)));
}

#[test]
fn test_empty_search_submit_removes_key() {
    let search = SearchBox::new();
    let delta = search.submit_delta();

    let params = Params::from_iter([("search", json!("old")), ("status", json!("open"))]);
    let merged = params.merged(delta);
    assert_eq!(merged.get("search"), None);
    assert_eq!(merged.get("status"), Some(&json!("open")));
    assert_eq!(merged.get("page"), Some(&json!(1)));
}
