//! The host-supplied pagination envelope.

use serde::Deserialize;
use serde_json::Value;

use crate::widgets::pagination::DEFAULT_LIMIT;

/// Property name holding the row array when the host does not override it.
pub const DEFAULT_DATA_KEY: &str = "docs";

/// Page metadata carried alongside the rows.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Meta {
    page: Option<u64>,
    limit: Option<u64>,
    total_pages: Option<u64>,
    total: Option<u64>,
    offset: Option<u64>,
    paging_counter: Option<u64>,
    has_prev_page: Option<bool>,
    has_next_page: Option<bool>,
}

/// One already-fetched page of rows plus its metadata.
///
/// Wholly owned and replaced by the host on every parameter change; the
/// library never mutates it. The row array lives under a configurable
/// data key (default `"docs"`).
#[derive(Debug, Clone, Default)]
pub struct DataSource {
    rows: Vec<Value>,
    meta: Meta,
}

impl DataSource {
    /// Build from an envelope value, reading rows from the default key.
    pub fn new(envelope: Value) -> Self {
        Self::with_data_key(envelope, DEFAULT_DATA_KEY)
    }

    /// Build from an envelope value with a custom data key.
    ///
    /// A non-object envelope, or a data key not holding an array, yields
    /// an empty page rather than an error — absent-safe like every other
    /// host-supplied input.
    pub fn with_data_key(envelope: Value, data_key: &str) -> Self {
        let Value::Object(mut map) = envelope else {
            return Self::default();
        };
        let rows = match map.remove(data_key) {
            Some(Value::Array(rows)) => rows,
            _ => Vec::new(),
        };
        let meta = serde_json::from_value(Value::Object(map)).unwrap_or_default();
        Self { rows, meta }
    }

    /// The current page's rows.
    pub fn rows(&self) -> &[Value] {
        &self.rows
    }

    /// Current page, 1-based.
    pub fn page(&self) -> u64 {
        self.meta.page.unwrap_or(1).max(1)
    }

    /// Page size.
    pub fn limit(&self) -> u64 {
        match self.meta.limit {
            Some(0) | None => DEFAULT_LIMIT,
            Some(limit) => limit,
        }
    }

    /// Total page count.
    pub fn total_pages(&self) -> u64 {
        self.meta.total_pages.unwrap_or(0)
    }

    /// Total item count across all pages, when the host supplies it.
    pub fn total(&self) -> Option<u64> {
        self.meta.total
    }

    /// Offset of the first row, when the host supplies it.
    pub fn offset(&self) -> Option<u64> {
        self.meta.offset
    }

    /// Running counter of the first row, when the host supplies it.
    pub fn paging_counter(&self) -> Option<u64> {
        self.meta.paging_counter
    }

    /// Whether a previous page exists. Falls back to `page > 1`.
    pub fn has_prev_page(&self) -> bool {
        self.meta.has_prev_page.unwrap_or(self.page() > 1)
    }

    /// Whether a next page exists. Falls back to `page < totalPages`.
    pub fn has_next_page(&self) -> bool {
        self.meta.has_next_page.unwrap_or(self.page() < self.total_pages())
    }
}
