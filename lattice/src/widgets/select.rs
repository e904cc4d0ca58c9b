//! Option select state.
//!
//! Used by the filter popover's select fields and the footer's limit and
//! go-to-page dropdowns. Selection is value-based so a select hydrated
//! from ambient params keeps working when the option list is rebuilt.

use crossterm::event::{KeyCode, KeyEvent};
use nucleo_matcher::pattern::{AtomKind, CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32Str};
use serde_json::Value;

use crate::utils::value_key;

use super::input::{Input, InputEvent};

/// One selectable value/label pair.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectOption {
    pub value: Value,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<Value>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// What a key press did to the select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectEvent {
    /// The chosen values changed.
    Changed,
    /// The dropdown closed (Esc or a closing choice).
    Closed,
    /// The key was not for this widget.
    Ignored,
}

/// A dropdown select with value-based selection.
///
/// Single selects hold at most one chosen value; multi selects toggle
/// values in and out. Searchable selects fuzzy-filter their options
/// against a typed query.
#[derive(Debug, Clone)]
pub struct Select {
    options: Vec<SelectOption>,
    chosen: Vec<Value>,
    multi: bool,
    searchable: bool,
    placeholder: String,
    open: bool,
    cursor: usize,
    query: Input,
}

impl Select {
    pub fn new(options: Vec<SelectOption>) -> Self {
        Self {
            options,
            chosen: Vec::new(),
            multi: false,
            searchable: false,
            placeholder: String::new(),
            open: false,
            cursor: 0,
            query: Input::new(),
        }
    }

    /// Allow multiple chosen values.
    pub fn multi(mut self) -> Self {
        self.multi = true;
        self
    }

    /// Fuzzy-filter options against a typed query while open.
    pub fn searchable(mut self) -> Self {
        self.searchable = true;
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    pub fn is_multi(&self) -> bool {
        self.multi
    }

    /// The chosen values, in choice order.
    pub fn chosen(&self) -> &[Value] {
        &self.chosen
    }

    /// Replace the chosen values (hydration from ambient params).
    /// Single selects keep only the first value.
    pub fn set_chosen(&mut self, values: Vec<Value>) {
        self.chosen = if self.multi {
            values
        } else {
            values.into_iter().take(1).collect()
        };
    }

    pub fn clear(&mut self) {
        self.chosen.clear();
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
        self.cursor = 0;
        self.query.clear();
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// The query typed into a searchable select, if any.
    pub fn query(&self) -> &str {
        self.query.text()
    }

    fn is_chosen(&self, value: &Value) -> bool {
        self.chosen.contains(value)
    }

    /// Option indices matching the current query, best match first.
    ///
    /// An empty query (or a non-searchable select) yields all options in
    /// their supplied order.
    pub fn filtered_indices(&self) -> Vec<usize> {
        let query = self.query.text();
        if !self.searchable || query.is_empty() {
            return (0..self.options.len()).collect();
        }

        let mut matcher = Matcher::new(Config::DEFAULT);
        let pattern = Pattern::new(
            query,
            CaseMatching::Ignore,
            Normalization::Smart,
            AtomKind::Fuzzy,
        );

        let mut matches: Vec<(usize, u32)> = self
            .options
            .iter()
            .enumerate()
            .filter_map(|(index, option)| {
                let mut buf = Vec::new();
                let haystack = Utf32Str::new(&option.label, &mut buf);
                pattern.score(haystack, &mut matcher).map(|score| (index, score))
            })
            .collect();
        matches.sort_by(|a, b| b.1.cmp(&a.1));
        matches.into_iter().map(|(index, _)| index).collect()
    }

    /// The option under the dropdown cursor.
    pub fn cursor_option(&self) -> Option<&SelectOption> {
        let filtered = self.filtered_indices();
        filtered.get(self.cursor).map(|&i| &self.options[i])
    }

    /// Cursor position within the filtered list.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Choose the value at the cursor. Multi selects toggle and stay
    /// open; single selects replace and close.
    fn choose_at_cursor(&mut self) -> SelectEvent {
        let Some(option) = self.cursor_option().cloned() else {
            return SelectEvent::Ignored;
        };
        if self.multi {
            if self.is_chosen(&option.value) {
                self.chosen.retain(|value| value != &option.value);
            } else {
                self.chosen.push(option.value);
            }
            SelectEvent::Changed
        } else {
            self.chosen = vec![option.value];
            self.open = false;
            SelectEvent::Changed
        }
    }

    /// Apply a key press while the select has focus.
    pub fn handle_key(&mut self, key: &KeyEvent) -> SelectEvent {
        if !self.open {
            return match key.code {
                KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Down => {
                    self.open();
                    SelectEvent::Changed
                }
                _ => SelectEvent::Ignored,
            };
        }

        match key.code {
            KeyCode::Esc => {
                self.open = false;
                SelectEvent::Closed
            }
            KeyCode::Up => {
                self.cursor = self.cursor.saturating_sub(1);
                SelectEvent::Changed
            }
            KeyCode::Down => {
                let count = self.filtered_indices().len();
                if count > 0 {
                    self.cursor = (self.cursor + 1).min(count - 1);
                }
                SelectEvent::Changed
            }
            KeyCode::Enter => self.choose_at_cursor(),
            KeyCode::Char(' ') if self.multi => self.choose_at_cursor(),
            _ if self.searchable => match self.query.handle_key(key) {
                InputEvent::Changed => {
                    self.cursor = 0;
                    SelectEvent::Changed
                }
                _ => SelectEvent::Ignored,
            },
            _ => SelectEvent::Ignored,
        }
    }

    /// Labels of the chosen values joined for display, or the placeholder.
    pub fn summary(&self) -> String {
        if self.chosen.is_empty() {
            return self.placeholder.clone();
        }
        self.chosen
            .iter()
            .map(|value| {
                self.options
                    .iter()
                    .find(|option| &option.value == value)
                    .map(|option| option.label.clone())
                    .unwrap_or_else(|| value_key(value))
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Marker for an option row in the open dropdown.
    pub fn option_indicator(&self, option: &SelectOption) -> &'static str {
        if self.multi {
            if self.is_chosen(&option.value) { "■" } else { "□" }
        } else if self.is_chosen(&option.value) {
            "●"
        } else {
            "○"
        }
    }
}
