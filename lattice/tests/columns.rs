use lattice::store::{ColumnVisibilityStore, KeyValueStore};
use lattice::widgets::table::{Column, ColumnSet};

fn store() -> KeyValueStore {
    KeyValueStore::in_memory()
}

fn sample_columns() -> Vec<Column> {
    vec![
        Column::new("id", "ID", 8),
        Column::new("name", "Name", 24).sortable(),
        Column::new("email", "Email", 30).hidden(),
        Column::new("ops", "Ops", 10).action(),
    ]
}

fn column_set(store: &KeyValueStore) -> ColumnSet {
    ColumnSet::new(
        "users",
        sample_columns(),
        ColumnVisibilityStore::new(store.clone()),
    )
}

#[test]
fn test_formatted_excludes_action_columns() {
    let columns = column_set(&store());
    let formatted = columns.formatted();
    assert_eq!(formatted.len(), 3);
    assert!(formatted.iter().all(|column| column.key != "ops"));
}

#[test]
fn test_formatted_preserves_order_and_defaults() {
    let columns = column_set(&store());
    let formatted = columns.formatted();
    let keys: Vec<&str> = formatted.iter().map(|column| column.key.as_str()).collect();
    assert_eq!(keys, ["id", "name", "email"]);
    assert!(!formatted[0].hidden);
    assert!(formatted[2].hidden);
}

#[test]
fn test_toggle_round_trip() {
    let columns = column_set(&store());

    columns.toggle("name", true).unwrap();
    let formatted = columns.formatted();
    let name = formatted.iter().find(|column| column.key == "name").unwrap();
    assert!(name.hidden);

    columns.toggle("name", false).unwrap();
    let formatted = columns.formatted();
    let name = formatted.iter().find(|column| column.key == "name").unwrap();
    assert!(!name.hidden);
}

#[test]
fn test_toggle_never_affects_other_columns() {
    let columns = column_set(&store());

    columns.toggle("name", true).unwrap();

    let formatted = columns.formatted();
    let id = formatted.iter().find(|column| column.key == "id").unwrap();
    let email = formatted.iter().find(|column| column.key == "email").unwrap();
    assert!(!id.hidden);
    assert!(email.hidden); // still its declared default
}

#[test]
fn test_reset_restores_declared_defaults() {
    let columns = column_set(&store());

    columns.toggle("id", true).unwrap();
    columns.toggle("email", false).unwrap();
    columns.reset().unwrap();

    let formatted = columns.formatted();
    assert!(!formatted.iter().find(|c| c.key == "id").unwrap().hidden);
    assert!(!formatted.iter().find(|c| c.key == "name").unwrap().hidden);
    assert!(formatted.iter().find(|c| c.key == "email").unwrap().hidden);
}

#[test]
fn test_visibility_shared_across_instances_with_same_key() {
    let store = store();
    let first = column_set(&store);
    first.toggle("name", true).unwrap();

    // A second mount of the same table id sees the persisted flag.
    let second = column_set(&store);
    let formatted = second.formatted();
    assert!(formatted.iter().find(|c| c.key == "name").unwrap().hidden);
}

#[test]
fn test_unknown_stored_keys_fall_back_to_defaults() {
    let store = store();
    let visibility = ColumnVisibilityStore::new(store.clone());

    // Seed under an old definition set, then mount with a grown set.
    let first = ColumnSet::new(
        "grown",
        vec![Column::new("id", "ID", 8)],
        visibility.clone(),
    );
    first.toggle("id", true).unwrap();

    let second = ColumnSet::new(
        "grown",
        vec![
            Column::new("id", "ID", 8),
            Column::new("name", "Name", 24).hidden(),
        ],
        visibility,
    );
    let formatted = second.formatted();
    // Stored key wins; the new column reads its own default.
    assert!(formatted.iter().find(|c| c.key == "id").unwrap().hidden);
    assert!(formatted.iter().find(|c| c.key == "name").unwrap().hidden);
}

#[test]
fn test_seed_snapshot_stays_authoritative() {
    let store = store();
    let visibility = ColumnVisibilityStore::new(store.clone());

    let first = ColumnSet::new(
        "snap",
        vec![Column::new("id", "ID", 8)],
        visibility.clone(),
    );
    assert!(!first.formatted()[0].hidden);

    // Remount with a changed declared default: the stored seed wins
    // until reset is called explicitly.
    let second = ColumnSet::new(
        "snap",
        vec![Column::new("id", "ID", 8).hidden()],
        visibility,
    );
    assert!(!second.formatted()[0].hidden);

    second.reset().unwrap();
    assert!(second.formatted()[0].hidden);
}
