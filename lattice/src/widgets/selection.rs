//! Selection state for the data table.
//!
//! Selection tracks row keys, not row objects, so membership stays stable
//! across page navigations: keys belonging to rows on other pages remain
//! selected until explicitly cleared.

use std::collections::HashSet;

use serde_json::Value;

/// A row's stable unique identifier, compared by value.
///
/// Keys are scalars. Non-integral numbers are canonicalized to their
/// string form so equality and hashing stay well-defined.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RowKey {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl RowKey {
    /// Extract a key from a row-field value. Objects and arrays have no
    /// key; null has none either.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::Str(s.clone())),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Some(Self::Int(i)),
                None => Some(Self::Str(n.to_string())),
            },
            Value::Bool(b) => Some(Self::Bool(*b)),
            _ => None,
        }
    }

    /// The key as a JSON value, for handing back to the host.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Str(s) => Value::String(s.clone()),
            Self::Int(i) => Value::Number((*i).into()),
            Self::Bool(b) => Value::Bool(*b),
        }
    }
}

impl std::fmt::Display for RowKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Str(s) => write!(f, "{s}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for RowKey {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for RowKey {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for RowKey {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

/// Aggregate selection state of the current page's rows.
///
/// Drives the header checkbox: `Indeterminate` is the third,
/// partially-selected visual state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriState {
    Checked,
    Indeterminate,
    Unchecked,
}

impl TriState {
    /// Header checkbox glyph.
    pub fn indicator(self) -> &'static str {
        match self {
            Self::Checked => "■",
            Self::Indeterminate => "◪",
            Self::Unchecked => "□",
        }
    }
}

/// Key-based selection state.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    selected: HashSet<RowKey>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// All selected keys, sorted for deterministic ordering.
    pub fn selected(&self) -> Vec<RowKey> {
        let mut keys: Vec<_> = self.selected.iter().cloned().collect();
        keys.sort();
        keys
    }

    pub fn is_selected(&self, key: &RowKey) -> bool {
        self.selected.contains(key)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Add or remove a single key. Returns whether anything changed.
    pub fn select_one(&mut self, key: RowKey, checked: bool) -> bool {
        if checked {
            self.selected.insert(key)
        } else {
            self.selected.remove(&key)
        }
    }

    /// Select or deselect every key on the current page.
    ///
    /// Checked unions the page keys into the selection; unchecked removes
    /// exactly the page keys. Keys from other pages are untouched either
    /// way. Returns whether anything changed.
    pub fn select_all_on_page(&mut self, page_keys: &[RowKey], checked: bool) -> bool {
        let mut changed = false;
        for key in page_keys {
            let did = if checked {
                self.selected.insert(key.clone())
            } else {
                self.selected.remove(key)
            };
            changed |= did;
        }
        changed
    }

    /// Tri-state summary of the page keys' membership.
    ///
    /// All present → `Checked`; none present → `Unchecked`; otherwise
    /// `Indeterminate`. An empty page counts as fully selected, matching
    /// the zero-of-zero membership count.
    pub fn page_state(&self, page_keys: &[RowKey]) -> TriState {
        let selected_on_page = page_keys
            .iter()
            .filter(|key| self.selected.contains(key))
            .count();
        if selected_on_page == page_keys.len() {
            TriState::Checked
        } else if selected_on_page > 0 {
            TriState::Indeterminate
        } else {
            TriState::Unchecked
        }
    }

    /// Replace the selection with exactly the given keys.
    ///
    /// Used when the externally supplied default selection changes; the
    /// external value is the source of truth. Returns whether the set
    /// actually differed.
    pub fn sync(&mut self, keys: &[RowKey]) -> bool {
        let next: HashSet<RowKey> = keys.iter().cloned().collect();
        if next == self.selected {
            return false;
        }
        self.selected = next;
        true
    }

    /// Clear all selection.
    pub fn clear(&mut self) -> bool {
        if self.selected.is_empty() {
            return false;
        }
        self.selected.clear();
        true
    }
}
