//! Persisted column visibility.

use std::collections::BTreeMap;

use log::warn;

use super::{KeyValueStore, StoreError};

/// Column key → hidden flag, for one table id.
pub type VisibilityMap = BTreeMap<String, bool>;

const KEY_PREFIX: &str = "columns/";

/// Persisted mapping from table id to per-column hidden flags.
///
/// The first render of a table id seeds the store from the column
/// definitions' own defaults; that snapshot stays authoritative until the
/// user toggles a column or resets. Column keys that appear later (the
/// definitions grew between sessions) are not re-seeded — readers fall
/// back to the definition default for missing keys.
#[derive(Debug, Clone)]
pub struct ColumnVisibilityStore {
    store: KeyValueStore,
}

impl ColumnVisibilityStore {
    /// Create over a shared key-value store.
    pub fn new(store: KeyValueStore) -> Self {
        Self { store }
    }

    fn storage_key(table_id: &str) -> String {
        format!("{KEY_PREFIX}{table_id}")
    }

    /// Read the stored map for a table id.
    ///
    /// A failed read degrades to an empty map so the table renders with
    /// the definitions' own defaults.
    pub fn get(&self, table_id: &str) -> VisibilityMap {
        match self.store.get(&Self::storage_key(table_id)) {
            Ok(Some(map)) => map,
            Ok(None) => VisibilityMap::new(),
            Err(err) => {
                warn!("column visibility read failed for {table_id}: {err}");
                VisibilityMap::new()
            }
        }
    }

    /// Replace the stored map for a table id.
    pub fn set(&self, table_id: &str, map: &VisibilityMap) -> Result<(), StoreError> {
        self.store.set(&Self::storage_key(table_id), map)
    }

    /// Seed the store from declared defaults if no entry exists yet.
    ///
    /// The written snapshot becomes the new default even if the
    /// definitions change later; callers wanting updated defaults must
    /// call [`reset`](Self::reset).
    pub fn seed_defaults(
        &self,
        table_id: &str,
        defaults: &VisibilityMap,
    ) -> Result<(), StoreError> {
        if defaults.is_empty() || !self.get(table_id).is_empty() {
            return Ok(());
        }
        self.set(table_id, defaults)
    }

    /// Write a single column's hidden flag, leaving every other key as is.
    pub fn toggle(&self, table_id: &str, column_key: &str, hidden: bool) -> Result<(), StoreError> {
        let mut map = self.get(table_id);
        map.insert(column_key.to_string(), hidden);
        self.set(table_id, &map)
    }

    /// Rewrite the whole entry back to the declared defaults.
    pub fn reset(&self, table_id: &str, defaults: &VisibilityMap) -> Result<(), StoreError> {
        self.set(table_id, defaults)
    }
}
