//! Sort state for table columns.

use serde_json::Value;

use crate::params::Params;

/// Param key holding the sorted field.
pub const PARAM_SORT_FIELD: &str = "sortField";
/// Param key holding the sort direction.
pub const PARAM_SORT_ORDER: &str = "sortOrder";

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    /// Header indicator glyph.
    pub fn indicator(self) -> &'static str {
        match self {
            Self::Asc => "▲",
            Self::Desc => "▼",
        }
    }
}

/// At most one sorted (field, direction) pair.
///
/// A click on field F cycles: other field or unsorted → `(F, Asc)`;
/// `(F, Asc)` → `(F, Desc)`; `(F, Desc)` → unsorted. The state derives
/// from externally supplied params so a host that restores sort from a
/// URL stays in sync; it is never persisted here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    sorted: Option<(String, SortOrder)>,
}

impl SortState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive from `params.sortField` / `params.sortOrder`.
    ///
    /// A field with a missing or unknown order defaults to ascending; a
    /// missing field means unsorted.
    pub fn from_params(params: &Params) -> Self {
        let sorted = params.get_str(PARAM_SORT_FIELD).map(|field| {
            let order = params
                .get_str(PARAM_SORT_ORDER)
                .and_then(SortOrder::parse)
                .unwrap_or(SortOrder::Asc);
            (field.to_string(), order)
        });
        Self { sorted }
    }

    /// The active (field, direction) pair, if any.
    pub fn sorted(&self) -> Option<(&str, SortOrder)> {
        self.sorted
            .as_ref()
            .map(|(field, order)| (field.as_str(), *order))
    }

    /// The direction applied to one field, if that field is the sorted one.
    pub fn order_for(&self, field: &str) -> Option<SortOrder> {
        match &self.sorted {
            Some((sorted_field, order)) if sorted_field == field => Some(*order),
            _ => None,
        }
    }

    /// Apply one click on a sortable field and return the param delta to
    /// emit: `{sortField, sortOrder}`, both `null` when cleared so the
    /// merge removes them.
    pub fn cycle(&mut self, field: &str) -> [(&'static str, Value); 2] {
        self.sorted = match self.order_for(field) {
            None => Some((field.to_string(), SortOrder::Asc)),
            Some(SortOrder::Asc) => Some((field.to_string(), SortOrder::Desc)),
            Some(SortOrder::Desc) => None,
        };
        self.delta()
    }

    /// The `{sortField, sortOrder}` pair describing the current state.
    pub fn delta(&self) -> [(&'static str, Value); 2] {
        match &self.sorted {
            Some((field, order)) => [
                (PARAM_SORT_FIELD, Value::String(field.clone())),
                (PARAM_SORT_ORDER, Value::String(order.as_str().to_string())),
            ],
            None => [(PARAM_SORT_FIELD, Value::Null), (PARAM_SORT_ORDER, Value::Null)],
        }
    }
}
