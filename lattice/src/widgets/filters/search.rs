//! Free-text search box.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::text::Line;
use serde_json::Value;

use crate::params::{PARAM_PAGE, PARAM_SEARCH, Params};
use crate::widgets::input::{Input, InputEvent};

use super::panel::ParamDelta;

/// What a key press did to the search box.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    /// The search was submitted; carries the param delta to merge.
    Submitted(ParamDelta),
    /// The draft text changed (nothing emitted yet).
    Changed,
    /// Focus left the box.
    Blurred,
    /// The key was not for this widget.
    Ignored,
}

/// Explicit-submit search field.
///
/// Typing edits a draft; only Enter submits. Submission emits the
/// trimmed value (or `null` when empty, removing the key) together with
/// a forced `page: 1` — changing the search term always returns to the
/// first page.
#[derive(Debug, Clone)]
pub struct SearchBox {
    input: Input,
    param: String,
}

impl SearchBox {
    pub fn new() -> Self {
        Self::with_param(PARAM_SEARCH)
    }

    /// Use a non-default param key.
    pub fn with_param(param: impl Into<String>) -> Self {
        Self {
            input: Input::with_placeholder("Search…"),
            param: param.into(),
        }
    }

    /// The param key this box writes.
    pub fn param(&self) -> &str {
        &self.param
    }

    /// Current draft text.
    pub fn text(&self) -> &str {
        self.input.text()
    }

    /// Hydrate the draft from the ambient params.
    pub fn sync_from_params(&mut self, params: &Params) {
        self.input
            .set_text(params.get_str(&self.param).unwrap_or_default());
    }

    /// The delta a submission of the current draft produces.
    ///
    /// An empty draft emits `null` so the merge removes the key.
    pub fn submit_delta(&self) -> ParamDelta {
        let trimmed = self.input.text().trim();
        let value = if trimmed.is_empty() {
            Value::Null
        } else {
            Value::String(trimmed.to_string())
        };
        ParamDelta::from_iter([
            (self.param.clone(), value),
            (PARAM_PAGE.to_string(), Value::from(1)),
        ])
    }

    /// Apply a key press while the box has focus.
    pub fn handle_key(&mut self, key: &KeyEvent) -> SearchEvent {
        if key.code == KeyCode::Esc {
            return SearchEvent::Blurred;
        }
        match self.input.handle_key(key) {
            InputEvent::Submitted(_) => SearchEvent::Submitted(self.submit_delta()),
            InputEvent::Changed => SearchEvent::Changed,
            InputEvent::Ignored => SearchEvent::Ignored,
        }
    }

    /// Render the draft into a line of at most `width` columns.
    pub fn line(&self, width: u16, focused: bool) -> Line<'static> {
        self.input.line(width, focused)
    }
}

impl Default for SearchBox {
    fn default() -> Self {
        Self::new()
    }
}
