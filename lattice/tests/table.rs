use std::sync::{Arc, Mutex};

use lattice::params::Params;
use lattice::store::KeyValueStore;
use lattice::widgets::selection::{RowKey, TriState};
use lattice::widgets::table::{Column, DataTable};
use serde_json::{Value, json};

fn columns() -> Vec<Column> {
    vec![
        Column::new("id", "ID", 8),
        Column::new("name", "Name", 24).sortable(),
        Column::new("city", "City", 20).data_index("address.city"),
    ]
}

fn two_row_envelope() -> Value {
    json!({
        "docs": [
            {"id": "1", "name": "A", "address": {"city": "Oslo"}},
            {"id": "2", "name": "B", "address": {"city": "Bergen"}},
        ],
        "page": 1,
        "limit": 10,
        "totalPages": 1,
        "total": 2,
    })
}

fn table() -> DataTable {
    DataTable::new("people", columns(), "id", &KeyValueStore::in_memory())
}

#[test]
fn test_rows_read_from_default_data_key() {
    let table = table();
    table.set_data(two_row_envelope());
    assert_eq!(table.page_row_keys(), vec![RowKey::from("1"), RowKey::from("2")]);
}

#[test]
fn test_rows_read_from_custom_data_key() {
    let table = DataTable::new("people", columns(), "id", &KeyValueStore::in_memory())
        .with_data_key("items");
    table.set_data(json!({
        "items": [{"id": "9"}],
        "page": 1, "limit": 10, "totalPages": 1,
    }));
    assert_eq!(table.page_row_keys(), vec![RowKey::from("9")]);
}

#[test]
fn test_select_all_then_deselect_one_is_some() {
    let table = table().with_checkbox();
    table.set_data(two_row_envelope());

    table.select_all_on_page(true);
    assert_eq!(table.page_selection_state(), TriState::Checked);

    table.toggle_row(0); // deselect row "1"
    assert_eq!(table.page_selection_state(), TriState::Indeterminate);
    assert_eq!(table.selected(), vec![RowKey::from("2")]);
}

#[test]
fn test_selection_survives_page_swap() {
    let table = table().with_checkbox();
    table.set_data(two_row_envelope());
    table.select_all_on_page(true);

    // Host swaps in page 2; page-1 keys stay selected.
    table.set_data(json!({
        "docs": [{"id": "3", "name": "C"}],
        "page": 2, "limit": 10, "totalPages": 2, "total": 3,
    }));
    assert_eq!(table.page_selection_state(), TriState::Unchecked);

    table.select_all_on_page(true);
    assert_eq!(
        table.selected(),
        vec![RowKey::from("1"), RowKey::from("2"), RowKey::from("3")]
    );

    table.select_all_on_page(false);
    assert_eq!(table.selected(), vec![RowKey::from("1"), RowKey::from("2")]);
}

#[test]
fn test_selection_change_notifies_with_full_array() {
    let emitted: Arc<Mutex<Vec<Vec<RowKey>>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = emitted.clone();
    let table = table()
        .with_checkbox()
        .on_selected_items_change(move |keys| sink.lock().unwrap().push(keys.to_vec()));
    table.set_data(two_row_envelope());

    table.select_all_on_page(true);
    let calls = emitted.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0], vec![RowKey::from("1"), RowKey::from("2")]);
}

#[test]
fn test_default_selection_resync_fires_no_notification() {
    let emitted: Arc<Mutex<usize>> = Arc::new(Mutex::new(0));
    let sink = emitted.clone();
    let table = table()
        .with_checkbox()
        .on_selected_items_change(move |_| *sink.lock().unwrap() += 1);
    table.set_data(two_row_envelope());

    table.set_default_selected(vec![RowKey::from("1")]);
    assert_eq!(*emitted.lock().unwrap(), 0);
    assert_eq!(table.selected(), vec![RowKey::from("1")]);

    // Mutating back to exactly the default is also silent.
    table.toggle_row(1);
    table.toggle_row(1);
    assert_eq!(*emitted.lock().unwrap(), 1); // only the first toggle differed
}

#[test]
fn test_limit_change_merges_additively_and_resets_page() {
    let emitted: Arc<Mutex<Option<Params>>> = Arc::new(Mutex::new(None));
    let sink = emitted.clone();
    let table = table()
        .with_pagination()
        .on_param_change(move |params| *sink.lock().unwrap() = Some(params.clone()));

    table.set_params(Params::from_iter([("a", json!(1)), ("b", json!(2))]));
    table.set_data(two_row_envelope());

    // Drive the page-size menu: open, move to 20, choose.
    use crossterm::event::{KeyCode, KeyEvent};
    table.handle_key(&KeyEvent::from(KeyCode::Char('l')));
    table.handle_key(&KeyEvent::from(KeyCode::Down));
    table.handle_key(&KeyEvent::from(KeyCode::Enter));

    let params = emitted.lock().unwrap().clone().unwrap();
    assert_eq!(params.get("a"), Some(&json!(1)));
    assert_eq!(params.get("b"), Some(&json!(2)));
    assert_eq!(params.get("limit"), Some(&json!(20)));
    assert_eq!(params.get("page"), Some(&json!(1)));
}

#[test]
fn test_sort_click_emits_merged_cycle() {
    let emitted: Arc<Mutex<Option<Params>>> = Arc::new(Mutex::new(None));
    let sink = emitted.clone();
    let table = table()
        .on_param_change(move |params| *sink.lock().unwrap() = Some(params.clone()));
    table.set_params(Params::from_iter([("search", json!("abc"))]));
    table.set_data(two_row_envelope());

    table.toggle_sort("name");
    let params = emitted.lock().unwrap().clone().unwrap();
    assert_eq!(params.get("sortField"), Some(&json!("name")));
    assert_eq!(params.get("sortOrder"), Some(&json!("asc")));
    assert_eq!(params.get("search"), Some(&json!("abc")));

    table.toggle_sort("name");
    let params = emitted.lock().unwrap().clone().unwrap();
    assert_eq!(params.get("sortOrder"), Some(&json!("desc")));

    table.toggle_sort("name");
    let params = emitted.lock().unwrap().clone().unwrap();
    assert_eq!(params.get("sortField"), None);
    assert_eq!(params.get("sortOrder"), None);
}

#[test]
fn test_non_sortable_column_never_emits() {
    let emitted: Arc<Mutex<usize>> = Arc::new(Mutex::new(0));
    let sink = emitted.clone();
    let table = table().on_param_change(move |_| *sink.lock().unwrap() += 1);
    table.set_data(two_row_envelope());

    table.toggle_sort("id");
    assert_eq!(*emitted.lock().unwrap(), 0);
}

#[test]
fn test_empty_span_counts_checkbox_and_numbers() {
    let table = table().with_checkbox().with_numbers();
    table.set_data(json!({"docs": [], "page": 1, "limit": 10, "totalPages": 0}));
    assert_eq!(table.empty_span(), 5);
}

#[test]
fn test_empty_span_without_extras() {
    let table = table();
    assert_eq!(table.empty_span(), 3);
}

#[test]
fn test_row_numbers_continue_across_pages() {
    let table = table().with_numbers();
    table.set_data(json!({
        "docs": [{"id": "21"}, {"id": "22"}],
        "page": 3, "limit": 10, "totalPages": 5, "total": 42,
    }));
    assert_eq!(table.row_number(0), 21);
    assert_eq!(table.row_number(1), 22);
}

#[test]
fn test_header_bar_requires_a_header_feature() {
    assert!(!table().header_bar_enabled());
    assert!(table().with_search().header_bar_enabled());
    assert!(table().with_columns_dropdown().header_bar_enabled());
    assert!(
        table()
            .with_filters(vec![lattice::widgets::filters::Filter::new("status", "Status")])
            .header_bar_enabled()
    );
}

#[test]
fn test_scenario_select_all_then_deselect_first() {
    // dataSource = two rows, rowKey = "id": select all → "all";
    // deselect row "1" → "some".
    let table = table().with_checkbox();
    table.set_data(two_row_envelope());

    table.select_all_on_page(true);
    assert_eq!(table.page_selection_state(), TriState::Checked);

    table.toggle_row(0);
    assert_eq!(table.page_selection_state(), TriState::Indeterminate);
}

#[test]
fn test_filter_apply_through_panel_emits_delta_and_merged_params() {
    use crossterm::event::{KeyCode, KeyEvent};
    use lattice::widgets::filters::Filter;
    use lattice::widgets::select::SelectOption;

    let deltas: Arc<Mutex<Vec<lattice::widgets::filters::ParamDelta>>> =
        Arc::new(Mutex::new(Vec::new()));
    let merged: Arc<Mutex<Option<Params>>> = Arc::new(Mutex::new(None));
    let delta_sink = deltas.clone();
    let merged_sink = merged.clone();

    let table = table()
        .with_filters(vec![
            Filter::new("status", "Status").options(vec![
                SelectOption::new("open", "Open"),
                SelectOption::new("closed", "Closed"),
            ]),
            Filter::new("owner", "Owner"),
        ])
        .on_filter_change(move |delta| delta_sink.lock().unwrap().push(delta.clone()))
        .on_param_change(move |params| *merged_sink.lock().unwrap() = Some(params.clone()));
    table.set_params(Params::from_iter([("search", json!("abc"))]));
    table.set_data(two_row_envelope());

    // Open the panel, move to the free-text owner field, type, submit.
    table.handle_key(&KeyEvent::from(KeyCode::Char('f')));
    table.handle_key(&KeyEvent::from(KeyCode::Tab));
    for ch in "sam".chars() {
        table.handle_key(&KeyEvent::from(KeyCode::Char(ch)));
    }
    table.handle_key(&KeyEvent::from(KeyCode::Enter));

    let deltas = deltas.lock().unwrap();
    assert_eq!(deltas.len(), 1);
    assert_eq!(deltas[0].get("owner"), Some(&json!("sam")));

    let params = merged.lock().unwrap().clone().unwrap();
    assert_eq!(params.get("owner"), Some(&json!("sam")));
    assert_eq!(params.get("page"), Some(&json!(1)));
    // The unset select filter is absent, unrelated keys survive.
    assert_eq!(params.get("status"), None);
    assert_eq!(params.get("search"), Some(&json!("abc")));
}

#[test]
fn test_row_click_receives_full_row() {
    let clicked: Arc<Mutex<Option<Value>>> = Arc::new(Mutex::new(None));
    let sink = clicked.clone();
    let table = table().on_row_click(move |row| *sink.lock().unwrap() = Some(row.clone()));
    table.set_data(two_row_envelope());

    use crossterm::event::{KeyCode, KeyEvent};
    table.handle_key(&KeyEvent::from(KeyCode::Enter));
    let row = clicked.lock().unwrap().clone().unwrap();
    assert_eq!(row["id"], json!("1"));
    assert_eq!(row["address"]["city"], json!("Oslo"));
}

#[test]
fn test_export_rows_use_export_renderers() {
    let columns = vec![
        Column::new("id", "ID", 8),
        Column::new("name", "Name", 24)
            .render_export(|value, _row| format!("name={}", value.as_str().unwrap_or(""))),
        Column::new("secret", "Secret", 10).hidden(),
    ];
    let table = DataTable::new("export", columns, "id", &KeyValueStore::in_memory());
    table.set_data(json!({
        "docs": [{"id": "1", "name": "A", "secret": "s"}],
        "page": 1, "limit": 10, "totalPages": 1,
    }));

    let rows = table.export_rows();
    // Hidden columns are excluded; the export renderer formats the cell.
    assert_eq!(rows[0], vec!["ID".to_string(), "Name".to_string()]);
    assert_eq!(rows[1], vec!["1".to_string(), "name=A".to_string()]);
}

#[test]
fn test_formatted_columns_visible_through_table() {
    let table = table();
    let formatted = table.formatted_columns();
    assert_eq!(formatted.len(), 3);
    assert_eq!(table.visible_columns().len(), 3);
}
