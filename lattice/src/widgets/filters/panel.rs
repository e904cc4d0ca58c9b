//! The filter popover form.

use crossterm::event::{KeyCode, KeyEvent};
use serde_json::{Map, Value};

use crate::params::{PARAM_PAGE, Params};
use crate::widgets::input::{Input, InputEvent};
use crate::widgets::select::{Select, SelectEvent};

use super::{Filter, param_values};

/// A param delta. Kept as a raw map so `null` entries survive until the
/// merge, where they remove their keys.
pub type ParamDelta = Map<String, Value>;

/// What a key press did to the panel.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelEvent {
    /// Apply was triggered; carries the full form value set (plus a
    /// forced `page: 1`) to merge into params.
    Applied(ParamDelta),
    /// Reset was triggered; carries every filter name set to `null`.
    Reset(ParamDelta),
    /// The panel closed without applying.
    Closed,
    /// Focus or a draft value changed.
    Changed,
    /// The key was not for this widget.
    Ignored,
}

/// Form state for one filter field.
#[derive(Debug, Clone)]
enum Field {
    Text(Input),
    Choice(Select),
}

/// A popover form generated 1:1 from the filter definitions.
///
/// Fields hydrate from the ambient params on open (multi filters coerce
/// scalars into one-element arrays); apply emits the complete form value
/// set; reset clears the form and emits every name as `null` so the
/// merge removes them.
#[derive(Debug, Clone)]
pub struct FilterPanel {
    filters: Vec<Filter>,
    fields: Vec<Field>,
    open: bool,
    cursor: usize,
}

impl FilterPanel {
    pub fn new(filters: Vec<Filter>) -> Self {
        let fields = filters
            .iter()
            .map(|filter| match &filter.options {
                Some(options) => {
                    let mut select = Select::new(options.clone());
                    if filter.is_multi {
                        select = select.multi();
                    }
                    if filter.is_searchable {
                        select = select.searchable();
                    }
                    if let Some(placeholder) = &filter.placeholder {
                        select = select.with_placeholder(placeholder.clone());
                    }
                    Field::Choice(select)
                }
                None => Field::Text(match &filter.placeholder {
                    Some(placeholder) => Input::with_placeholder(placeholder.clone()),
                    None => Input::new(),
                }),
            })
            .collect();
        Self {
            filters,
            fields,
            open: false,
            cursor: 0,
        }
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Focused row: field index, or the Reset/Apply buttons past the end.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn reset_row(&self) -> usize {
        self.fields.len()
    }

    fn apply_row(&self) -> usize {
        self.fields.len() + 1
    }

    /// Open the popover, hydrating every field from the ambient params.
    pub fn open(&mut self, params: &Params) {
        self.open = true;
        self.cursor = 0;
        self.sync_from_params(params);
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Rebuild the form drafts from the ambient params.
    pub fn sync_from_params(&mut self, params: &Params) {
        for (filter, field) in self.filters.iter().zip(self.fields.iter_mut()) {
            let values = param_values(filter, params.get(&filter.name));
            match field {
                Field::Text(input) => {
                    let text = values
                        .first()
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string();
                    input.set_text(text);
                }
                Field::Choice(select) => select.set_chosen(values),
            }
        }
    }

    /// The full form value set as a param delta, plus `page: 1`.
    ///
    /// Empty drafts emit `null` so the merge removes their keys.
    pub fn apply_delta(&self) -> ParamDelta {
        let mut delta = ParamDelta::new();
        for (filter, field) in self.filters.iter().zip(self.fields.iter()) {
            let value = match field {
                Field::Text(input) => {
                    let trimmed = input.text().trim();
                    if trimmed.is_empty() {
                        Value::Null
                    } else {
                        Value::String(trimmed.to_string())
                    }
                }
                Field::Choice(select) => {
                    let chosen = select.chosen();
                    if chosen.is_empty() {
                        Value::Null
                    } else if filter.is_multi {
                        Value::Array(chosen.to_vec())
                    } else {
                        chosen[0].clone()
                    }
                }
            };
            delta.insert(filter.name.clone(), value);
        }
        delta.insert(PARAM_PAGE.to_string(), Value::from(1));
        delta
    }

    /// Every filter name set to `null` — the reset delta.
    pub fn reset_delta(&self) -> ParamDelta {
        self.filters
            .iter()
            .map(|filter| (filter.name.clone(), Value::Null))
            .collect()
    }

    /// Clear every field's draft.
    pub fn clear_form(&mut self) {
        for field in &mut self.fields {
            match field {
                Field::Text(input) => input.clear(),
                Field::Choice(select) => select.clear(),
            }
        }
    }

    fn focused_select_open(&self) -> bool {
        matches!(
            self.fields.get(self.cursor),
            Some(Field::Choice(select)) if select.is_open()
        )
    }

    /// Apply a key press while the panel is open.
    pub fn handle_key(&mut self, key: &KeyEvent) -> PanelEvent {
        if !self.open {
            return PanelEvent::Ignored;
        }

        // An open dropdown inside the form captures navigation first.
        if self.focused_select_open()
            && let Some(Field::Choice(select)) = self.fields.get_mut(self.cursor)
        {
            return match select.handle_key(key) {
                SelectEvent::Changed => PanelEvent::Changed,
                SelectEvent::Closed => PanelEvent::Changed,
                SelectEvent::Ignored => PanelEvent::Ignored,
            };
        }

        match key.code {
            KeyCode::Esc => {
                self.open = false;
                PanelEvent::Closed
            }
            KeyCode::Tab | KeyCode::Down => {
                self.cursor = (self.cursor + 1).min(self.apply_row());
                PanelEvent::Changed
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.cursor = self.cursor.saturating_sub(1);
                PanelEvent::Changed
            }
            KeyCode::Enter if self.cursor == self.apply_row() => self.apply(),
            KeyCode::Enter if self.cursor == self.reset_row() => self.reset(),
            _ => match self.fields.get_mut(self.cursor) {
                Some(Field::Text(input)) => match input.handle_key(key) {
                    // Enter in a text field submits the form.
                    InputEvent::Submitted(_) => self.apply(),
                    InputEvent::Changed => PanelEvent::Changed,
                    InputEvent::Ignored => PanelEvent::Ignored,
                },
                Some(Field::Choice(select)) => match select.handle_key(key) {
                    SelectEvent::Changed => PanelEvent::Changed,
                    SelectEvent::Closed => PanelEvent::Changed,
                    SelectEvent::Ignored => PanelEvent::Ignored,
                },
                None => PanelEvent::Ignored,
            },
        }
    }

    fn apply(&mut self) -> PanelEvent {
        let delta = self.apply_delta();
        self.open = false;
        PanelEvent::Applied(delta)
    }

    fn reset(&mut self) -> PanelEvent {
        self.clear_form();
        let delta = self.reset_delta();
        self.open = false;
        PanelEvent::Reset(delta)
    }

    /// Move focus to a row (field index, or the Reset/Apply rows).
    pub(crate) fn set_cursor(&mut self, row: usize) {
        self.cursor = row.min(self.apply_row());
    }

    /// Activate a row from a mouse click: fields take focus, the buttons
    /// fire.
    pub(crate) fn activate_row(&mut self, row: usize) -> PanelEvent {
        self.set_cursor(row);
        if row == self.apply_row() {
            self.apply()
        } else if row == self.reset_row() {
            self.reset()
        } else if let Some(Field::Choice(select)) = self.fields.get_mut(row) {
            if select.is_open() {
                select.close();
            } else {
                select.open();
            }
            PanelEvent::Changed
        } else {
            PanelEvent::Changed
        }
    }

    /// Field accessors used by the renderer.
    pub(crate) fn field_line(
        &self,
        index: usize,
        width: u16,
        focused: bool,
    ) -> ratatui::text::Line<'static> {
        match &self.fields[index] {
            Field::Text(input) => input.line(width, focused),
            Field::Choice(select) => ratatui::text::Line::from(select.summary()),
        }
    }

    pub(crate) fn field_select(&self, index: usize) -> Option<&Select> {
        match self.fields.get(index) {
            Some(Field::Choice(select)) => Some(select),
            _ => None,
        }
    }
}
