//! Column formatting against the persisted visibility store.

use crate::store::{ColumnVisibilityStore, StoreError, VisibilityMap};

use super::column::{Column, ColumnKind};

/// A table's raw column definitions bound to its persisted visibility.
///
/// Produces the renderable column list: action columns filtered out, each
/// remaining column annotated with the persisted hidden flag (falling
/// back to the definition's own default), in the supplied order.
#[derive(Debug, Clone)]
pub struct ColumnSet {
    table_id: String,
    columns: Vec<Column>,
    store: ColumnVisibilityStore,
}

impl ColumnSet {
    /// Bind definitions to a table id, seeding the store from the
    /// declared defaults on first observation.
    pub fn new(
        table_id: impl Into<String>,
        columns: Vec<Column>,
        store: ColumnVisibilityStore,
    ) -> Self {
        let table_id = table_id.into();
        let defaults = declared_defaults(&columns);
        if let Err(err) = store.seed_defaults(&table_id, &defaults) {
            log::warn!("column visibility seed failed for {table_id}: {err}");
        }
        Self {
            table_id,
            columns,
            store,
        }
    }

    /// The table id the visibility is persisted under.
    pub fn table_id(&self) -> &str {
        &self.table_id
    }

    /// The raw definitions as supplied.
    pub fn raw(&self) -> &[Column] {
        &self.columns
    }

    /// The renderable list: data columns only, hidden resolved from the
    /// store with a read-time fallback to each definition's default.
    pub fn formatted(&self) -> Vec<Column> {
        let stored = self.store.get(&self.table_id);
        self.columns
            .iter()
            .filter(|column| column.kind != ColumnKind::Action)
            .map(|column| {
                let mut column = column.clone();
                column.hidden = *stored.get(&column.key).unwrap_or(&column.hidden);
                column
            })
            .collect()
    }

    /// The formatted list minus hidden columns — what the grid lays out.
    pub fn visible(&self) -> Vec<Column> {
        self.formatted()
            .into_iter()
            .filter(|column| !column.hidden)
            .collect()
    }

    /// Write a single column's hidden flag. Never touches sibling keys.
    pub fn toggle(&self, column_key: &str, hidden: bool) -> Result<(), StoreError> {
        self.store.toggle(&self.table_id, column_key, hidden)
    }

    /// Rewrite the whole entry back to the declared defaults.
    pub fn reset(&self) -> Result<(), StoreError> {
        self.store
            .reset(&self.table_id, &declared_defaults(&self.columns))
    }
}

fn declared_defaults(columns: &[Column]) -> VisibilityMap {
    columns
        .iter()
        .map(|column| (column.key.clone(), column.hidden))
        .collect()
}
