use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{TimeZone, Utc};
use lattice::store::{DateRange, DateRangeStore, KeyValueStore, SqliteBackend};
use serde_json::json;

#[test]
fn test_typed_round_trip() {
    let store = KeyValueStore::in_memory();
    store.set("k", &json!({"a": 1})).unwrap();
    let value: Option<serde_json::Value> = store.get("k").unwrap();
    assert_eq!(value, Some(json!({"a": 1})));
}

#[test]
fn test_get_or_returns_default_when_missing() {
    let store = KeyValueStore::in_memory();
    let value: u64 = store.get_or("missing", 7).unwrap();
    assert_eq!(value, 7);
}

#[test]
fn test_delete_removes_key() {
    let store = KeyValueStore::in_memory();
    store.set("k", &1u64).unwrap();
    store.delete("k").unwrap();
    let value: Option<u64> = store.get("k").unwrap();
    assert_eq!(value, None);
}

#[test]
fn test_keys_with_prefix() {
    let store = KeyValueStore::in_memory();
    store.set("columns/users", &1u64).unwrap();
    store.set("columns/orders", &2u64).unwrap();
    store.set("date_ranges/users", &3u64).unwrap();

    let mut keys = store.keys_with_prefix("columns/").unwrap();
    keys.sort();
    assert_eq!(keys, ["columns/orders", "columns/users"]);
}

#[test]
fn test_subscribers_see_writes() {
    let store = KeyValueStore::in_memory();
    let hits = Arc::new(AtomicUsize::new(0));
    let seen = hits.clone();
    store.subscribe(move |key| {
        if key == "k" {
            seen.fetch_add(1, Ordering::SeqCst);
        }
    });

    store.set("k", &1u64).unwrap();
    store.set("other", &2u64).unwrap();
    store.delete("k").unwrap();

    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[test]
fn test_sqlite_backend_round_trip() {
    let store = KeyValueStore::new(SqliteBackend::in_memory().unwrap());
    store.set("k", &json!(["a", "b"])).unwrap();
    let value: Option<serde_json::Value> = store.get("k").unwrap();
    assert_eq!(value, Some(json!(["a", "b"])));
}

#[test]
fn test_sqlite_persists_across_reopens() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.db");

    {
        let store = KeyValueStore::new(SqliteBackend::new(&path).unwrap());
        store.set("columns/users", &json!({"name": true})).unwrap();
    }

    // A fresh backend over the same file sees the write.
    let store = KeyValueStore::new(SqliteBackend::new(&path).unwrap());
    let value: Option<serde_json::Value> = store.get("columns/users").unwrap();
    assert_eq!(value, Some(json!({"name": true})));
}

#[test]
fn test_date_range_store_round_trip() {
    let store = DateRangeStore::new(KeyValueStore::in_memory());
    let range = DateRange::new(
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap(),
    );

    assert_eq!(store.get("orders"), None);
    store.set("orders", range).unwrap();
    assert_eq!(store.get("orders"), Some(range));

    store.clear("orders").unwrap();
    assert_eq!(store.get("orders"), None);
}

#[test]
fn test_trailing_weeks_window() {
    let range = DateRange::trailing_weeks(2);
    assert!(range.from < range.to);
    assert_eq!((range.to - range.from).num_days(), 14);
}
