//! Event handling for the data table.
//!
//! Keyboard map (body focus): `↑`/`↓` move the cursor row, `Space`
//! toggles selection, `a` toggles select-all-on-page, `Enter` activates
//! the row, `←`/`→` change page, `/` focuses search, `f` opens the
//! filter popover, `c` the column toggles, `e` the export menu, `m` the
//! actions menu, `l` the page-size menu. Popovers capture keys while
//! open; `Esc` closes them.

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::params::Params;
use crate::widgets::events::EventResult;
use crate::widgets::filters::{PanelEvent, ParamDelta, SearchEvent};
use crate::widgets::menu::MenuEvent;
use crate::widgets::pagination::DEFAULT_LIMIT_OPTIONS;

use super::render::columns_menu_entries;
use super::state::{DataTable, Focus, Overlay};

/// Deferred outcome of an input event, executed after the state lock is
/// released so emissions never re-enter a locked table.
enum Action {
    None,
    Consumed,
    EmitMerged(Params),
    EmitFilter(ParamDelta, Params),
    ToggleSort(String),
    ToggleRow(usize),
    ToggleSelectAll,
    ClickRow(usize),
    ChangePage(u64),
    ChangeLimit(u64),
    SetColumnHidden(String, bool),
    ResetColumns,
    InvokeExport(usize),
    InvokeAction(usize),
}

impl DataTable {
    /// Handle a key press.
    pub fn handle_key(&self, key: &KeyEvent) -> EventResult {
        let action = self.key_action(key);
        self.run(action)
    }

    /// Handle a mouse event. Only left-button presses are routed.
    pub fn handle_mouse(&self, mouse: &MouseEvent) -> EventResult {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return EventResult::Ignored;
        }
        let action = self.mouse_action(mouse.column, mouse.row);
        self.run(action)
    }

    fn run(&self, action: Action) -> EventResult {
        match action {
            Action::None => EventResult::Ignored,
            Action::Consumed => {
                self.mark_dirty();
                EventResult::Consumed
            }
            Action::EmitMerged(params) => {
                self.emit_merged(&params);
                EventResult::Consumed
            }
            Action::EmitFilter(delta, merged) => {
                self.emit_filter(&delta, &merged);
                EventResult::Consumed
            }
            Action::ToggleSort(key) => {
                self.toggle_sort(&key);
                EventResult::Consumed
            }
            Action::ToggleRow(index) => {
                self.toggle_row(index);
                EventResult::Consumed
            }
            Action::ToggleSelectAll => {
                self.toggle_select_all();
                EventResult::Consumed
            }
            Action::ClickRow(index) => {
                self.click_row(index);
                EventResult::Consumed
            }
            Action::ChangePage(page) => {
                self.change_page(page);
                EventResult::Consumed
            }
            Action::ChangeLimit(limit) => {
                self.change_limit(limit);
                EventResult::Consumed
            }
            Action::SetColumnHidden(key, hidden) => {
                self.set_column_hidden(&key, hidden);
                EventResult::Consumed
            }
            Action::ResetColumns => {
                self.reset_columns();
                EventResult::Consumed
            }
            Action::InvokeExport(index) => {
                let option = self.read().export_options.get(index).cloned();
                if let Some(option) = option {
                    option.invoke();
                }
                EventResult::Consumed
            }
            Action::InvokeAction(index) => {
                let action = self.read().actions.get(index).cloned();
                if let Some(action) = action {
                    action.invoke();
                }
                EventResult::Consumed
            }
        }
    }

    fn key_action(&self, key: &KeyEvent) -> Action {
        let mut inner = self.write();

        match inner.overlay {
            Overlay::FilterPanel => {
                let event = inner.panel.handle_key(key);
                match event {
                    PanelEvent::Applied(delta) | PanelEvent::Reset(delta) => {
                        inner.overlay = Overlay::None;
                        let merged = inner.params.merged(delta.clone());
                        Action::EmitFilter(delta, merged)
                    }
                    PanelEvent::Closed => {
                        inner.overlay = Overlay::None;
                        Action::Consumed
                    }
                    PanelEvent::Changed => Action::Consumed,
                    PanelEvent::Ignored => Action::None,
                }
            }
            Overlay::ColumnsMenu => {
                let entries = columns_menu_entries(&inner);
                match inner.columns_menu.handle_key(key, entries.len()) {
                    MenuEvent::Activated(0) => Action::ResetColumns,
                    MenuEvent::Activated(index) => {
                        // Toggle the column behind the menu entry; the
                        // dropdown stays open for further toggles.
                        match inner.columns.formatted().get(index - 1) {
                            Some(column) => {
                                Action::SetColumnHidden(column.key.clone(), !column.hidden)
                            }
                            None => Action::None,
                        }
                    }
                    MenuEvent::Closed => {
                        inner.overlay = Overlay::None;
                        Action::Consumed
                    }
                    MenuEvent::Changed => Action::Consumed,
                    MenuEvent::Ignored => Action::None,
                }
            }
            Overlay::ExportMenu => {
                let len = inner.export_options.len();
                match inner.export_menu.handle_key(key, len) {
                    MenuEvent::Activated(index) => {
                        inner.overlay = Overlay::None;
                        Action::InvokeExport(index)
                    }
                    MenuEvent::Closed => {
                        inner.overlay = Overlay::None;
                        Action::Consumed
                    }
                    MenuEvent::Changed => Action::Consumed,
                    MenuEvent::Ignored => Action::None,
                }
            }
            Overlay::ActionsMenu => {
                let len = inner.actions.len();
                match inner.actions_menu.handle_key(key, len) {
                    MenuEvent::Activated(index) => {
                        inner.overlay = Overlay::None;
                        Action::InvokeAction(index)
                    }
                    MenuEvent::Closed => {
                        inner.overlay = Overlay::None;
                        Action::Consumed
                    }
                    MenuEvent::Changed => Action::Consumed,
                    MenuEvent::Ignored => Action::None,
                }
            }
            Overlay::LimitMenu => {
                match inner.limit_menu.handle_key(key, DEFAULT_LIMIT_OPTIONS.len()) {
                    MenuEvent::Activated(index) => {
                        inner.overlay = Overlay::None;
                        Action::ChangeLimit(DEFAULT_LIMIT_OPTIONS[index])
                    }
                    MenuEvent::Closed => {
                        inner.overlay = Overlay::None;
                        Action::Consumed
                    }
                    MenuEvent::Changed => Action::Consumed,
                    MenuEvent::Ignored => Action::None,
                }
            }
            Overlay::None => match inner.focus {
                Focus::Search => match inner.search.handle_key(key) {
                    SearchEvent::Submitted(delta) => {
                        inner.focus = Focus::Body;
                        let merged = inner.params.merged(delta);
                        Action::EmitMerged(merged)
                    }
                    SearchEvent::Blurred => {
                        inner.focus = Focus::Body;
                        Action::Consumed
                    }
                    SearchEvent::Changed => Action::Consumed,
                    SearchEvent::Ignored => Action::None,
                },
                Focus::Body => self.body_key_action(key, &mut inner),
            },
        }
    }

    fn body_key_action(
        &self,
        key: &KeyEvent,
        inner: &mut super::state::DataTableInner,
    ) -> Action {
        let row_count = inner.data.rows().len();
        match key.code {
            KeyCode::Char('/') if inner.has_search => {
                inner.focus = Focus::Search;
                Action::Consumed
            }
            KeyCode::Char('f') if !inner.panel.is_empty() => {
                let params = inner.params.clone();
                inner.panel.open(&params);
                inner.overlay = Overlay::FilterPanel;
                Action::Consumed
            }
            KeyCode::Char('c') if inner.has_columns_dropdown && !inner.table_key.is_empty() => {
                inner.columns_menu.open();
                inner.overlay = Overlay::ColumnsMenu;
                Action::Consumed
            }
            KeyCode::Char('e') if !inner.export_options.is_empty() => {
                inner.export_menu.open();
                inner.overlay = Overlay::ExportMenu;
                Action::Consumed
            }
            KeyCode::Char('m') if !inner.actions.is_empty() => {
                inner.actions_menu.open();
                inner.overlay = Overlay::ActionsMenu;
                Action::Consumed
            }
            KeyCode::Char('l') if inner.has_pagination => {
                inner.limit_menu.open();
                inner.overlay = Overlay::LimitMenu;
                Action::Consumed
            }
            KeyCode::Up => {
                if let Some(cursor) = inner.cursor {
                    inner.cursor = Some(cursor.saturating_sub(1));
                }
                Action::Consumed
            }
            KeyCode::Down => {
                if row_count > 0 {
                    let cursor = inner.cursor.map_or(0, |c| (c + 1).min(row_count - 1));
                    inner.cursor = Some(cursor);
                }
                Action::Consumed
            }
            KeyCode::Char(' ') if inner.has_checkbox => match inner.cursor {
                Some(cursor) => Action::ToggleRow(cursor),
                None => Action::None,
            },
            KeyCode::Char('a') if inner.has_checkbox => Action::ToggleSelectAll,
            KeyCode::Enter => match inner.cursor {
                Some(cursor) => Action::ClickRow(cursor),
                None => Action::None,
            },
            KeyCode::Left if inner.has_pagination && inner.data.has_prev_page() => {
                Action::ChangePage(inner.data.page() - 1)
            }
            KeyCode::Right if inner.has_pagination && inner.data.has_next_page() => {
                Action::ChangePage(inner.data.page() + 1)
            }
            _ => Action::None,
        }
    }

    fn mouse_action(&self, x: u16, y: u16) -> Action {
        let mut inner = self.write();

        // An open popover captures the click: rows activate, anywhere
        // else dismisses.
        if inner.overlay != Overlay::None {
            let row = inner
                .geometry
                .overlay_rows
                .iter()
                .find(|(rect, _)| contains(*rect, x, y))
                .map(|(_, index)| *index);
            return match row {
                Some(index) => match inner.overlay {
                    Overlay::FilterPanel => match inner.panel.activate_row(index) {
                        PanelEvent::Applied(delta) | PanelEvent::Reset(delta) => {
                            inner.overlay = Overlay::None;
                            let merged = inner.params.merged(delta.clone());
                            Action::EmitFilter(delta, merged)
                        }
                        PanelEvent::Closed => {
                            inner.overlay = Overlay::None;
                            Action::Consumed
                        }
                        _ => Action::Consumed,
                    },
                    Overlay::ColumnsMenu => {
                        if index == 0 {
                            Action::ResetColumns
                        } else {
                            match inner.columns.formatted().get(index - 1) {
                                Some(column) => {
                                    Action::SetColumnHidden(column.key.clone(), !column.hidden)
                                }
                                None => Action::None,
                            }
                        }
                    }
                    Overlay::ExportMenu => {
                        inner.overlay = Overlay::None;
                        Action::InvokeExport(index)
                    }
                    Overlay::ActionsMenu => {
                        inner.overlay = Overlay::None;
                        Action::InvokeAction(index)
                    }
                    Overlay::LimitMenu => {
                        inner.overlay = Overlay::None;
                        Action::ChangeLimit(DEFAULT_LIMIT_OPTIONS[index])
                    }
                    Overlay::None => Action::None,
                },
                None => {
                    inner.overlay = Overlay::None;
                    Action::Consumed
                }
            };
        }

        if inner.geometry.search.is_some_and(|rect| contains(rect, x, y)) {
            inner.focus = Focus::Search;
            return Action::Consumed;
        }
        if inner
            .geometry
            .columns_button
            .is_some_and(|rect| contains(rect, x, y))
        {
            inner.columns_menu.open();
            inner.overlay = Overlay::ColumnsMenu;
            return Action::Consumed;
        }
        if inner
            .geometry
            .filter_button
            .is_some_and(|rect| contains(rect, x, y))
        {
            let params = inner.params.clone();
            inner.panel.open(&params);
            inner.overlay = Overlay::FilterPanel;
            return Action::Consumed;
        }
        if inner
            .geometry
            .export_button
            .is_some_and(|rect| contains(rect, x, y))
        {
            inner.export_menu.open();
            inner.overlay = Overlay::ExportMenu;
            return Action::Consumed;
        }
        if inner
            .geometry
            .actions_button
            .is_some_and(|rect| contains(rect, x, y))
        {
            inner.actions_menu.open();
            inner.overlay = Overlay::ActionsMenu;
            return Action::Consumed;
        }

        // Applied-filter chips: removing one emits the narrowed params.
        let chip_hit = inner
            .geometry
            .chips
            .iter()
            .position(|rect| contains(*rect, x, y));
        if let Some(index) = chip_hit {
            let chips = inner.applied.chips(&inner.params);
            if let Some(chip) = chips.get(index) {
                let merged = inner.applied.without_chip(&inner.params, chip);
                return Action::EmitMerged(merged);
            }
            return Action::None;
        }

        // Header row: select-all checkbox or a sortable column.
        if inner
            .geometry
            .header_row
            .is_some_and(|rect| contains(rect, x, y))
        {
            if inner
                .geometry
                .checkbox_col
                .as_ref()
                .is_some_and(|range| range.contains(&x))
            {
                return Action::ToggleSelectAll;
            }
            let column = inner
                .geometry
                .column_spans
                .iter()
                .find(|(range, _)| range.contains(&x))
                .map(|(_, key)| key.clone());
            return match column {
                Some(key) => Action::ToggleSort(key),
                None => Action::None,
            };
        }

        // Body rows: the checkbox cell toggles selection without
        // activating the row; anywhere else activates it.
        let row = inner
            .geometry
            .row_ys
            .iter()
            .find(|(row_y, _)| *row_y == y && contains(inner.geometry.body, x, y))
            .map(|(_, index)| *index);
        if let Some(index) = row {
            if inner
                .geometry
                .checkbox_col
                .as_ref()
                .is_some_and(|range| range.contains(&x))
            {
                return Action::ToggleRow(index);
            }
            return Action::ClickRow(index);
        }

        // Footer controls.
        if inner
            .geometry
            .limit_button
            .is_some_and(|rect| contains(rect, x, y))
        {
            inner.limit_menu.open();
            inner.overlay = Overlay::LimitMenu;
            return Action::Consumed;
        }
        if inner
            .geometry
            .prev_button
            .is_some_and(|rect| contains(rect, x, y))
        {
            return Action::ChangePage(inner.data.page() - 1);
        }
        if inner
            .geometry
            .next_button
            .is_some_and(|rect| contains(rect, x, y))
        {
            return Action::ChangePage(inner.data.page() + 1);
        }
        let page = inner
            .geometry
            .page_targets
            .iter()
            .find(|(rect, _)| contains(*rect, x, y))
            .map(|(_, page)| *page);
        if let Some(page) = page {
            return Action::ChangePage(page);
        }

        Action::None
    }
}

fn contains(rect: Rect, x: u16, y: u16) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}
