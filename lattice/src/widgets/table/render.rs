//! Data table rendering.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph};
use serde_json::Value;

use crate::utils::{display_value, lookup_path, truncate_to_width};
use crate::widgets::pagination::{DEFAULT_LIMIT_OPTIONS, PageItem, page_items};
use crate::widgets::selection::TriState;

use super::column::{Alignment, Column};
use super::state::{DataTable, DataTableInner, Focus, Geometry, Overlay, page_keys};

/// Width of the selection checkbox column, including trailing gap.
pub(super) const CHECKBOX_COL_WIDTH: u16 = 4;
/// Width of the row-number column, including trailing gap.
pub(super) const NUMBERS_COL_WIDTH: u16 = 6;
/// Gap between data columns.
const COLUMN_GAP: u16 = 1;

const CURSOR_BG: Color = Color::Rgb(0xA2, 0x77, 0xFF);
const SELECTED_BG: Color = Color::Rgb(0x6E, 0x54, 0x94);
const MUTED: Style = Style::new().add_modifier(Modifier::DIM);
const HEADER: Style = Style::new().add_modifier(Modifier::BOLD);
const BUTTON: Style = Style::new().add_modifier(Modifier::REVERSED);

impl DataTable {
    /// Render the table into `area` and cache geometry for hit testing.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let mut inner = self.write();
        inner.geometry = Geometry::default();
        inner.geometry.area = area;

        let block = Block::bordered();
        let content = block.inner(area);
        frame.render_widget(block, area);
        if content.width == 0 || content.height == 0 {
            self.clear_dirty();
            return;
        }

        let header_bar = self.header_bar_enabled_inner(&inner);
        let chips = inner.applied.chips(&inner.params);
        let has_chips_row = !chips.is_empty();
        let footer = inner.has_pagination;

        // Vertical slices: header bar, chips, column header + body, footer.
        let mut y = content.y;
        let mut remaining = content.height;

        let header_bar_area = header_bar.then(|| {
            let rect = Rect::new(content.x, y, content.width, 1.min(remaining));
            y += rect.height;
            remaining -= rect.height;
            rect
        });

        let chips_area = (has_chips_row && remaining > 0).then(|| {
            let rect = Rect::new(content.x, y, content.width, 1);
            y += 1;
            remaining -= 1;
            rect
        });

        let footer_height = u16::from(footer && remaining > 1);
        let grid_area = Rect::new(content.x, y, content.width, remaining - footer_height);
        let footer_area = (footer_height > 0).then(|| {
            Rect::new(
                content.x,
                content.y + content.height - 1,
                content.width,
                1,
            )
        });

        if let Some(bar) = header_bar_area {
            render_header_bar(frame, bar, &mut inner);
        }
        if let Some(chips_row) = chips_area {
            render_chips(frame, chips_row, &chips, &mut inner);
        }
        render_grid(frame, grid_area, &mut inner);
        if let Some(footer_row) = footer_area {
            render_footer(frame, footer_row, &mut inner);
        }
        render_overlay(frame, content, &mut inner);

        self.clear_dirty();
    }

    fn header_bar_enabled_inner(&self, inner: &DataTableInner) -> bool {
        inner.has_search
            || (inner.has_columns_dropdown && !inner.table_key.is_empty())
            || !inner.export_options.is_empty()
            || !inner.panel.is_empty()
    }
}

fn render_header_bar(frame: &mut Frame, area: Rect, inner: &mut DataTableInner) {
    // Search on the left.
    if inner.has_search {
        let width = area.width.min(30);
        let rect = Rect::new(area.x + 1, area.y, width.saturating_sub(1), 1);
        let focused = inner.focus == Focus::Search;
        let mut spans = vec![Span::styled("/ ", MUTED)];
        spans.extend(inner.search.line(rect.width.saturating_sub(2), focused).spans);
        frame.render_widget(Paragraph::new(Line::from(spans)), rect);
        inner.geometry.search = Some(rect);
    }

    // Buttons right-aligned: columns, filter, export, actions.
    let mut buttons: Vec<(String, ButtonKind)> = Vec::new();
    if inner.has_columns_dropdown && !inner.table_key.is_empty() {
        buttons.push(("Columns ▾".into(), ButtonKind::Columns));
    }
    if !inner.panel.is_empty() {
        let label = if crate::widgets::filters::any_active(inner.panel.filters(), &inner.params) {
            "Filter+ ▾"
        } else {
            "Filter ▾"
        };
        buttons.push((label.into(), ButtonKind::Filter));
    }
    if !inner.export_options.is_empty() {
        buttons.push(("Export ▾".into(), ButtonKind::Export));
    }
    if !inner.actions.is_empty() {
        buttons.push(("Actions ▾".into(), ButtonKind::Actions));
    }

    let mut x = area.x + area.width;
    for (label, kind) in buttons.iter().rev() {
        let width = label.chars().count() as u16 + 2;
        if x < area.x + width + 1 {
            break;
        }
        x -= width + 1;
        let rect = Rect::new(x, area.y, width, 1);
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(format!(" {label} "), BUTTON))),
            rect,
        );
        match kind {
            ButtonKind::Columns => inner.geometry.columns_button = Some(rect),
            ButtonKind::Filter => inner.geometry.filter_button = Some(rect),
            ButtonKind::Export => inner.geometry.export_button = Some(rect),
            ButtonKind::Actions => inner.geometry.actions_button = Some(rect),
        }
    }
}

#[derive(Clone, Copy)]
enum ButtonKind {
    Columns,
    Filter,
    Export,
    Actions,
}

fn render_chips(
    frame: &mut Frame,
    area: Rect,
    chips: &[crate::widgets::filters::Chip],
    inner: &mut DataTableInner,
) {
    let mut x = area.x + 1;
    for chip in chips {
        let label = format!(" {} ✕ ", chip.label);
        let width = label.chars().count() as u16;
        if x + width > area.x + area.width {
            break;
        }
        let rect = Rect::new(x, area.y, width, 1);
        frame.render_widget(Paragraph::new(Span::styled(label, BUTTON)), rect);
        inner.geometry.chips.push(rect);
        x += width + 1;
    }
}

fn render_grid(frame: &mut Frame, area: Rect, inner: &mut DataTableInner) {
    if area.height == 0 {
        return;
    }
    let columns = inner.columns.visible();
    let rows = inner.data.rows().to_vec();
    let keys = page_keys(inner);
    let cursor = inner.cursor;

    // Scroll the cursor into the viewport. With a sticky header the
    // header keeps the first line; otherwise it scrolls off with the
    // content.
    let body_height = area.height.saturating_sub(1) as usize;
    let offset = match cursor {
        Some(cursor) if body_height > 0 => cursor.saturating_sub(body_height - 1),
        _ => 0,
    };
    let show_header = inner.sticky_header || offset == 0;

    let mut y = area.y;
    if show_header {
        render_grid_header(frame, Rect::new(area.x, y, area.width, 1), &columns, inner);
        y += 1;
    }

    if rows.is_empty() {
        if y < area.y + area.height {
            render_empty_row(frame, Rect::new(area.x, y, area.width, 1), &columns, inner);
        }
        return;
    }

    let page = inner.data.page();
    let limit = inner.data.limit();
    let bottom = area.y + area.height;
    for (row_index, row) in rows.iter().enumerate().skip(offset) {
        if y >= bottom {
            break;
        }
        let row_area = Rect::new(area.x, y, area.width, 1);
        let selected = keys
            .get(row_index)
            .is_some_and(|key| inner.selection.is_selected(key));
        let focused = cursor == Some(row_index);
        render_data_row(
            frame, row_area, &columns, inner, row, row_index, page, limit, selected, focused,
        );
        inner.geometry.row_ys.push((y, row_index));
        y += 1;
    }
    inner.geometry.body = Rect::new(
        area.x,
        area.y + u16::from(show_header),
        area.width,
        area.height.saturating_sub(u16::from(show_header)),
    );
}

/// Column x-layout: checkbox, numbers, then each visible column.
fn column_x_positions(area: Rect, columns: &[Column], inner: &DataTableInner) -> Vec<u16> {
    let mut positions = Vec::with_capacity(columns.len());
    let mut x = area.x;
    if inner.has_checkbox {
        x += CHECKBOX_COL_WIDTH;
    }
    if inner.has_numbers {
        x += NUMBERS_COL_WIDTH;
    }
    for column in columns {
        positions.push(x);
        x += column.width + COLUMN_GAP;
    }
    positions
}

fn render_grid_header(
    frame: &mut Frame,
    area: Rect,
    columns: &[Column],
    inner: &mut DataTableInner,
) {
    inner.geometry.header_row = Some(area);
    let positions = column_x_positions(area, columns, inner);

    if inner.has_checkbox {
        let state = inner.selection.page_state(&page_keys(inner));
        let glyph = match state {
            TriState::Checked => "■",
            TriState::Indeterminate => "◪",
            TriState::Unchecked => "□",
        };
        let rect = Rect::new(area.x, area.y, CHECKBOX_COL_WIDTH.min(area.width), 1);
        frame.render_widget(Paragraph::new(Span::styled(format!(" {glyph}"), HEADER)), rect);
        inner.geometry.checkbox_col = Some(area.x..area.x + CHECKBOX_COL_WIDTH);
    }
    if inner.has_numbers {
        let x = area.x + if inner.has_checkbox { CHECKBOX_COL_WIDTH } else { 0 };
        if x < area.x + area.width {
            let rect = Rect::new(x, area.y, NUMBERS_COL_WIDTH.min(area.x + area.width - x), 1);
            frame.render_widget(Paragraph::new(Span::styled("#", HEADER)), rect);
        }
    }

    let right = area.x + area.width;
    for (column, &x) in columns.iter().zip(&positions) {
        if x >= right {
            break;
        }
        let width = column.width.min(right - x);
        let indicator = match inner.sort.order_for(&column.data_index) {
            Some(order) => order.indicator(),
            None if column.sortable => "⇅",
            None => "",
        };
        let text = if indicator.is_empty() {
            column.name.clone()
        } else {
            format!("{} {}", column.name, indicator)
        };
        let rect = Rect::new(x, area.y, width, 1);
        frame.render_widget(
            Paragraph::new(Span::styled(truncate_to_width(&text, width as usize), HEADER))
                .alignment(paragraph_alignment(column.align)),
            rect,
        );
        inner
            .geometry
            .column_spans
            .push((x..x + column.width + COLUMN_GAP, column.key.clone()));
    }
}

#[allow(clippy::too_many_arguments)]
fn render_data_row(
    frame: &mut Frame,
    area: Rect,
    columns: &[Column],
    inner: &DataTableInner,
    row: &Value,
    row_index: usize,
    page: u64,
    limit: u64,
    selected: bool,
    focused: bool,
) {
    if focused || selected {
        let bg = if focused { CURSOR_BG } else { SELECTED_BG };
        frame.render_widget(
            Block::default().style(Style::default().bg(bg).fg(Color::Black)),
            area,
        );
    }

    let positions = column_x_positions(area, columns, inner);
    let right = area.x + area.width;

    if inner.has_checkbox {
        let glyph = if selected { "■" } else { "□" };
        let rect = Rect::new(area.x, area.y, CHECKBOX_COL_WIDTH.min(area.width), 1);
        frame.render_widget(Paragraph::new(format!(" {glyph}")), rect);
    }
    if inner.has_numbers {
        let x = area.x + if inner.has_checkbox { CHECKBOX_COL_WIDTH } else { 0 };
        if x < right {
            let number = (page - 1) * limit + row_index as u64 + 1;
            let rect = Rect::new(x, area.y, NUMBERS_COL_WIDTH.min(right - x), 1);
            frame.render_widget(Paragraph::new(number.to_string()), rect);
        }
    }

    for (column, &x) in columns.iter().zip(&positions) {
        if x >= right {
            break;
        }
        let width = column.width.min(right - x);
        let value = lookup_path(row, &column.data_index)
            .cloned()
            .unwrap_or(Value::Null);
        let line = match &column.render {
            Some(render) => render(&value, row),
            None => Line::from(truncate_to_width(&display_value(&value), width as usize)),
        };
        frame.render_widget(
            Paragraph::new(line).alignment(paragraph_alignment(column.align)),
            Rect::new(x, area.y, width, 1),
        );
    }
}

/// The empty state spans every visible column, checkbox and number
/// columns included.
fn render_empty_row(
    frame: &mut Frame,
    area: Rect,
    columns: &[Column],
    inner: &DataTableInner,
) {
    let mut span_width: u16 = columns
        .iter()
        .map(|column| column.width + COLUMN_GAP)
        .sum();
    if inner.has_checkbox {
        span_width += CHECKBOX_COL_WIDTH;
    }
    if inner.has_numbers {
        span_width += NUMBERS_COL_WIDTH;
    }
    let rect = Rect::new(area.x, area.y, span_width.min(area.width).max(1), 1);
    frame.render_widget(
        Paragraph::new(Span::styled("No results", MUTED))
            .alignment(ratatui::layout::Alignment::Center),
        rect,
    );
}

fn render_footer(frame: &mut Frame, area: Rect, inner: &mut DataTableInner) {
    // Left: rows-per-page select.
    let limit = inner.data.limit();
    let label = format!("Rows per page: {limit} ▾");
    let width = (label.chars().count() as u16).min(area.width);
    let rect = Rect::new(area.x + 1, area.y, width, 1);
    frame.render_widget(Paragraph::new(label), rect);
    inner.geometry.limit_button = Some(rect);

    // Middle: selection summary against the envelope's total.
    let summary = format!(
        "{} of {} row(s) selected.",
        inner.selection.len(),
        inner.data.total().unwrap_or(0)
    );
    let summary_width = summary.chars().count() as u16;
    if area.width > summary_width {
        let x = area.x + (area.width - summary_width) / 2;
        frame.render_widget(
            Paragraph::new(Span::styled(summary, MUTED)),
            Rect::new(x, area.y, summary_width, 1),
        );
    }

    // Right: page navigation.
    let page = inner.data.page();
    let total_pages = inner.data.total_pages();
    let items = page_items(page, total_pages);

    let mut parts: Vec<(String, Option<FooterTarget>)> = Vec::new();
    parts.push((
        "‹".into(),
        inner.data.has_prev_page().then_some(FooterTarget::Prev),
    ));
    for item in &items {
        match item {
            PageItem::Page(p) => parts.push((p.to_string(), Some(FooterTarget::Page(*p)))),
            PageItem::Ellipsis => parts.push(("…".into(), None)),
        }
    }
    parts.push((
        "›".into(),
        inner.data.has_next_page().then_some(FooterTarget::Next),
    ));

    let total_width: u16 = parts
        .iter()
        .map(|(text, _)| text.chars().count() as u16 + 1)
        .sum();
    let mut x = (area.x + area.width).saturating_sub(total_width + 1);
    for (text, target) in parts {
        let width = text.chars().count() as u16;
        if x + width > area.x + area.width {
            break;
        }
        let rect = Rect::new(x, area.y, width, 1);
        let style = match &target {
            Some(FooterTarget::Page(p)) if *p == page => BUTTON,
            Some(_) => Style::default(),
            None => MUTED,
        };
        frame.render_widget(Paragraph::new(Span::styled(text, style)), rect);
        match target {
            Some(FooterTarget::Prev) => inner.geometry.prev_button = Some(rect),
            Some(FooterTarget::Next) => inner.geometry.next_button = Some(rect),
            Some(FooterTarget::Page(p)) => inner.geometry.page_targets.push((rect, p)),
            None => {}
        }
        x += width + 1;
    }
}

enum FooterTarget {
    Prev,
    Next,
    Page(u64),
}

/// Entries of the column-visibility dropdown: reset first, then one
/// toggle per formatted column.
pub(super) fn columns_menu_entries(inner: &DataTableInner) -> Vec<String> {
    let mut entries = vec!["↻ Reset columns".to_string()];
    entries.extend(inner.columns.formatted().iter().map(|column| {
        let glyph = if column.hidden { "□" } else { "■" };
        format!("{glyph} {}", column.name)
    }));
    entries
}

fn render_overlay(frame: &mut Frame, content: Rect, inner: &mut DataTableInner) {
    match inner.overlay {
        Overlay::None => {}
        Overlay::FilterPanel => render_filter_panel(frame, content, inner),
        Overlay::ColumnsMenu => {
            let entries = columns_menu_entries(inner);
            let anchor = inner.geometry.columns_button;
            render_menu(frame, content, anchor, &entries, inner.columns_menu.cursor(), inner);
        }
        Overlay::ExportMenu => {
            let entries: Vec<String> = inner
                .export_options
                .iter()
                .map(|option| option.label.clone())
                .collect();
            let anchor = inner.geometry.export_button;
            render_menu(frame, content, anchor, &entries, inner.export_menu.cursor(), inner);
        }
        Overlay::ActionsMenu => {
            let entries: Vec<String> =
                inner.actions.iter().map(|action| action.label.clone()).collect();
            let anchor = inner.geometry.actions_button;
            render_menu(frame, content, anchor, &entries, inner.actions_menu.cursor(), inner);
        }
        Overlay::LimitMenu => {
            let entries: Vec<String> = DEFAULT_LIMIT_OPTIONS
                .iter()
                .map(|limit| limit.to_string())
                .collect();
            let anchor = inner.geometry.limit_button;
            render_menu(frame, content, anchor, &entries, inner.limit_menu.cursor(), inner);
        }
    }
}

/// A dropdown list anchored under a trigger button.
fn render_menu(
    frame: &mut Frame,
    content: Rect,
    anchor: Option<Rect>,
    entries: &[String],
    cursor: usize,
    inner: &mut DataTableInner,
) {
    if entries.is_empty() {
        return;
    }
    let width = entries
        .iter()
        .map(|entry| entry.chars().count() as u16 + 4)
        .max()
        .unwrap_or(10)
        .min(content.width);
    let height = (entries.len() as u16 + 2).min(content.height);
    let anchor = anchor.unwrap_or(content);
    let x = (anchor.x + anchor.width)
        .saturating_sub(width)
        .max(content.x)
        .min(content.x + content.width - width);
    let y = (anchor.y + 1).min(content.y + content.height.saturating_sub(height));
    let area = Rect::new(x, y, width, height);

    frame.render_widget(Clear, area);
    let block = Block::bordered();
    let list = block.inner(area);
    frame.render_widget(block, area);

    inner.geometry.overlay = Some(area);
    for (index, entry) in entries.iter().enumerate() {
        let row_y = list.y + index as u16;
        if row_y >= list.y + list.height {
            break;
        }
        let rect = Rect::new(list.x, row_y, list.width, 1);
        let style = if index == cursor { BUTTON } else { Style::default() };
        frame.render_widget(
            Paragraph::new(Span::styled(
                truncate_to_width(entry, rect.width as usize),
                style,
            )),
            rect,
        );
        inner.geometry.overlay_rows.push((rect, index));
    }
}

/// The filter popover: one label + value row pair per filter, then the
/// Reset/Apply buttons.
fn render_filter_panel(frame: &mut Frame, content: Rect, inner: &mut DataTableInner) {
    let filters: Vec<_> = inner.panel.filters().to_vec();
    if filters.is_empty() {
        return;
    }
    let width = 36.min(content.width);
    let height = (filters.len() as u16 * 2 + 3).min(content.height);
    let anchor = inner.geometry.filter_button.unwrap_or(content);
    let x = (anchor.x + anchor.width)
        .saturating_sub(width)
        .max(content.x)
        .min(content.x + content.width - width);
    let y = (anchor.y + 1).min(content.y + content.height.saturating_sub(height));
    let area = Rect::new(x, y, width, height);

    frame.render_widget(Clear, area);
    let block = Block::bordered().title("Filter");
    let body = block.inner(area);
    frame.render_widget(block, area);
    inner.geometry.overlay = Some(area);

    let cursor = inner.panel.cursor();
    let mut row_y = body.y;
    for (index, filter) in filters.iter().enumerate() {
        if row_y + 1 >= body.y + body.height {
            break;
        }
        frame.render_widget(
            Paragraph::new(Span::styled(filter.label.clone(), MUTED)),
            Rect::new(body.x, row_y, body.width, 1),
        );
        let focused = cursor == index && inner.overlay == Overlay::FilterPanel;
        let value_rect = Rect::new(body.x + 1, row_y + 1, body.width.saturating_sub(1), 1);
        let mut line = inner.panel.field_line(index, value_rect.width, focused);
        if focused {
            line.style = Style::default().add_modifier(Modifier::BOLD);
        }
        frame.render_widget(Paragraph::new(line), value_rect);
        inner
            .geometry
            .overlay_rows
            .push((Rect::new(body.x, row_y, body.width, 2), index));
        row_y += 2;
    }

    // Reset / Apply buttons on the last row.
    let buttons_y = (body.y + body.height).saturating_sub(1);
    let reset_focused = cursor == filters.len();
    let apply_focused = cursor == filters.len() + 1;
    let reset_style = if reset_focused { BUTTON } else { MUTED };
    let apply_style = if apply_focused { BUTTON } else { Style::default() };
    let reset_rect = Rect::new(body.x, buttons_y, 9.min(body.width), 1);
    frame.render_widget(Paragraph::new(Span::styled(" Reset ", reset_style)), reset_rect);
    inner.geometry.overlay_rows.push((reset_rect, filters.len()));
    let apply_x = (body.x + body.width).saturating_sub(9);
    let apply_rect = Rect::new(apply_x, buttons_y, 9.min(body.width), 1);
    frame.render_widget(Paragraph::new(Span::styled(" Apply ", apply_style)), apply_rect);
    inner
        .geometry
        .overlay_rows
        .push((apply_rect, filters.len() + 1));

    // An open select field stacks its option list beneath the panel.
    if let Some(select) = inner.panel.field_select(cursor)
        && select.is_open()
    {
        let entries: Vec<String> = select
            .filtered_indices()
            .into_iter()
            .map(|i| {
                let option = &select.options()[i];
                format!("{} {}", select.option_indicator(option), option.label)
            })
            .collect();
        let list_height = (entries.len() as u16 + 2).min(content.height.saturating_sub(2));
        let list_y = (area.y + area.height).min(content.y + content.height - list_height);
        let list_area = Rect::new(area.x, list_y, width, list_height);
        frame.render_widget(Clear, list_area);
        let block = Block::bordered();
        let list = block.inner(list_area);
        frame.render_widget(block, list_area);
        for (index, entry) in entries.iter().enumerate() {
            let y = list.y + index as u16;
            if y >= list.y + list.height {
                break;
            }
            let style = if index == select.cursor() { BUTTON } else { Style::default() };
            frame.render_widget(
                Paragraph::new(Span::styled(truncate_to_width(entry, list.width as usize), style)),
                Rect::new(list.x, y, list.width, 1),
            );
        }
    }
}

fn paragraph_alignment(align: Alignment) -> ratatui::layout::Alignment {
    match align {
        Alignment::Left => ratatui::layout::Alignment::Left,
        Alignment::Center => ratatui::layout::Alignment::Center,
        Alignment::Right => ratatui::layout::Alignment::Right,
    }
}
