//! Filtering and search for the data table.
//!
//! Three cooperating pieces, all speaking param deltas:
//!
//! - [`SearchBox`] — free-text search, submitted explicitly (never per
//!   keystroke), emitting `{search, page: 1}`.
//! - [`FilterPanel`] — a popover form generated 1:1 from the
//!   [`Filter`] definitions; apply emits the full form value set with
//!   `page: 1`, reset emits every filter name as `null`.
//! - [`AppliedFilters`] — removable chips for every active filter value
//!   in the ambient params.

mod chips;
mod panel;
mod search;

pub use chips::{AppliedFilters, Chip};
pub use panel::{FilterPanel, PanelEvent, ParamDelta};
pub use search::{SearchBox, SearchEvent};

use std::collections::HashMap;

use serde_json::Value;

use crate::utils::value_key;
use crate::widgets::select::SelectOption;

/// One filter definition.
///
/// `name` must match a key that can legitimately appear in the ambient
/// params. A filter with options renders as a select (multi-valued when
/// `is_multi`); without options it renders as a free-text input.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    /// Param key this filter reads and writes.
    pub name: String,
    /// Field label in the popover form.
    pub label: String,
    /// Placeholder for the input/select.
    pub placeholder: Option<String>,
    /// Options for select filters; `None` means free text.
    pub options: Option<Vec<SelectOption>>,
    /// Whether the select accepts multiple values.
    pub is_multi: bool,
    /// Whether the select fuzzy-filters its options against a query.
    pub is_searchable: bool,
}

impl Filter {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn options(mut self, options: Vec<SelectOption>) -> Self {
        self.options = Some(options);
        self
    }

    pub fn multi(mut self) -> Self {
        self.is_multi = true;
        self
    }

    pub fn searchable(mut self) -> Self {
        self.is_searchable = true;
        self
    }

    /// Whether this filter renders as a select.
    pub fn is_select(&self) -> bool {
        self.options.is_some()
    }

    /// Value → label map for O(1) chip-label lookups.
    pub fn label_map(&self) -> HashMap<String, String> {
        self.options
            .iter()
            .flatten()
            .map(|option| (value_key(&option.value), option.label.clone()))
            .collect()
    }
}

/// Whether any of the filters holds an active value in `params`.
///
/// Drives the filter trigger button's "filtered" marker: active means a
/// non-empty scalar or non-empty array under the filter's name.
pub fn any_active(filters: &[Filter], params: &crate::params::Params) -> bool {
    filters.iter().any(|filter| params.is_active(&filter.name))
}

/// Coerce a param value into the form's value list for one filter.
///
/// Multi filters receiving a scalar get a one-element array, the way the
/// form hydration treats `name[]`-style params.
pub(crate) fn param_values(filter: &Filter, value: Option<&Value>) -> Vec<Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(values)) => values.clone(),
        Some(scalar) => vec![scalar.clone()],
    }
}
