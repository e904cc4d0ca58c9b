//! Data table state.

use std::ops::Range;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::debug;
use ratatui::layout::Rect;
use serde_json::Value;

use crate::params::{PARAM_LIMIT, PARAM_PAGE, Params};
use crate::store::{ColumnVisibilityStore, KeyValueStore};
use crate::utils::{display_value, lookup_path};
use crate::widgets::actions::ActionItem;
use crate::widgets::filters::{
    AppliedFilters, Filter, FilterPanel, ParamDelta, SearchBox, any_active,
};
use crate::widgets::menu::Menu;
use crate::widgets::selection::{RowKey, Selection, TriState};

use super::column::Column;
use super::envelope::{DEFAULT_DATA_KEY, DataSource};
use super::format::ColumnSet;
use super::sort::SortState;

/// Unique identifier for a DataTable widget instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableId(usize);

impl TableId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for TableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__datatable_{}", self.0)
    }
}

/// Handler for merged param emissions.
pub type ParamChangeHandler = Arc<dyn Fn(&Params) + Send + Sync>;
/// Handler for selection-array emissions.
pub type SelectionHandler = Arc<dyn Fn(&[RowKey]) + Send + Sync>;
/// Handler for formatted-column-list emissions.
pub type ColumnsHandler = Arc<dyn Fn(&[Column]) + Send + Sync>;
/// Handler for row activation.
pub type RowClickHandler = Arc<dyn Fn(&Value) + Send + Sync>;
/// Handler for raw filter deltas (before the params merge).
pub type FilterChangeHandler = Arc<dyn Fn(&ParamDelta) + Send + Sync>;

/// Which part of the table owns keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(super) enum Focus {
    #[default]
    Body,
    Search,
}

/// Which popover is open. At most one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(super) enum Overlay {
    #[default]
    None,
    FilterPanel,
    ColumnsMenu,
    ExportMenu,
    ActionsMenu,
    LimitMenu,
}

/// Geometry cached by the renderer for hit testing.
#[derive(Debug, Clone, Default)]
pub(super) struct Geometry {
    pub area: Rect,
    pub search: Option<Rect>,
    pub columns_button: Option<Rect>,
    pub filter_button: Option<Rect>,
    pub export_button: Option<Rect>,
    pub actions_button: Option<Rect>,
    /// Chip rects, parallel to the chip list computed at render time.
    pub chips: Vec<Rect>,
    pub header_row: Option<Rect>,
    /// x-range of the selection checkbox column, in absolute columns.
    pub checkbox_col: Option<Range<u16>>,
    /// Absolute x-range → column key, for header sort clicks.
    pub column_spans: Vec<(Range<u16>, String)>,
    pub body: Rect,
    /// Absolute y → row index on the current page.
    pub row_ys: Vec<(u16, usize)>,
    pub prev_button: Option<Rect>,
    pub next_button: Option<Rect>,
    /// Numbered page targets in the footer.
    pub page_targets: Vec<(Rect, u64)>,
    pub limit_button: Option<Rect>,
    /// The open popover's area and its activatable rows.
    pub overlay: Option<Rect>,
    pub overlay_rows: Vec<(Rect, usize)>,
}

pub(super) struct DataTableInner {
    pub table_key: String,
    pub columns: ColumnSet,
    pub row_key: String,
    pub data_key: String,
    pub data: DataSource,
    pub params: Params,
    pub sort: SortState,
    pub selection: Selection,
    pub default_selected: Vec<RowKey>,
    pub cursor: Option<usize>,
    pub focus: Focus,
    pub overlay: Overlay,

    pub has_search: bool,
    pub has_pagination: bool,
    pub has_checkbox: bool,
    pub has_numbers: bool,
    pub has_columns_dropdown: bool,
    pub sticky_header: bool,

    pub search: SearchBox,
    pub panel: FilterPanel,
    pub applied: AppliedFilters,
    pub columns_menu: Menu,
    pub export_menu: Menu,
    pub actions_menu: Menu,
    pub limit_menu: Menu,
    pub actions: Vec<ActionItem>,
    pub export_options: Vec<ActionItem>,

    pub on_param_change: Option<ParamChangeHandler>,
    pub on_selected_items_change: Option<SelectionHandler>,
    pub on_columns_update: Option<ColumnsHandler>,
    pub on_row_click: Option<RowClickHandler>,
    pub on_filter_change: Option<FilterChangeHandler>,

    pub geometry: Geometry,
}

/// A composable, params-driven data table.
///
/// The host supplies the current params and an already-fetched page of
/// rows; the table renders them and emits a merged params copy on every
/// interaction. The host refetches and passes a new page back down — the
/// table performs no fetching of its own.
///
/// # Example
///
/// ```ignore
/// let store = KeyValueStore::open_default()?;
/// let table = DataTable::new("users", columns, "id", &store)
///     .with_search()
///     .with_pagination()
///     .with_checkbox()
///     .with_columns_dropdown()
///     .with_filters(filters)
///     .on_param_change(|params| refetch(params));
///
/// table.set_params(params);
/// table.set_data(envelope_json);
/// ```
pub struct DataTable {
    id: TableId,
    pub(super) inner: Arc<RwLock<DataTableInner>>,
    pub(super) dirty: Arc<AtomicBool>,
}

impl DataTable {
    /// Create a table bound to a persistence key.
    ///
    /// `table_key` identifies this table in the column-visibility store;
    /// `row_key` names the row field used as the stable selection id.
    pub fn new(
        table_key: impl Into<String>,
        columns: Vec<Column>,
        row_key: impl Into<String>,
        store: &KeyValueStore,
    ) -> Self {
        let table_key = table_key.into();
        let columns = ColumnSet::new(
            table_key.clone(),
            columns,
            ColumnVisibilityStore::new(store.clone()),
        );
        let inner = DataTableInner {
            table_key,
            columns,
            row_key: row_key.into(),
            data_key: DEFAULT_DATA_KEY.to_string(),
            data: DataSource::default(),
            params: Params::new(),
            sort: SortState::new(),
            selection: Selection::new(),
            default_selected: Vec::new(),
            cursor: None,
            focus: Focus::Body,
            overlay: Overlay::None,
            has_search: false,
            has_pagination: false,
            has_checkbox: false,
            has_numbers: false,
            has_columns_dropdown: false,
            sticky_header: true,
            search: SearchBox::new(),
            panel: FilterPanel::new(Vec::new()),
            applied: AppliedFilters::new(Vec::new()),
            columns_menu: Menu::new(),
            export_menu: Menu::new(),
            actions_menu: Menu::new(),
            limit_menu: Menu::new(),
            actions: Vec::new(),
            export_options: Vec::new(),
            on_param_change: None,
            on_selected_items_change: None,
            on_columns_update: None,
            on_row_click: None,
            on_filter_change: None,
            geometry: Geometry::default(),
        };
        Self {
            id: TableId::new(),
            inner: Arc::new(RwLock::new(inner)),
            dirty: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Get the unique ID for this table instance.
    pub fn id(&self) -> TableId {
        self.id
    }

    pub(super) fn read(&self) -> RwLockReadGuard<'_, DataTableInner> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(super) fn write(&self) -> RwLockWriteGuard<'_, DataTableInner> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(super) fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::SeqCst);
    }

    /// Check if state changed since the last render.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Clear the dirty flag after rendering.
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }

    // =========================================================================
    // Builder configuration
    // =========================================================================

    /// Enable the header search box.
    pub fn with_search(self) -> Self {
        self.write().has_search = true;
        self
    }

    /// Enable the pagination footer.
    pub fn with_pagination(self) -> Self {
        self.write().has_pagination = true;
        self
    }

    /// Enable the selection checkbox column.
    pub fn with_checkbox(self) -> Self {
        self.write().has_checkbox = true;
        self
    }

    /// Enable the running row-number column.
    pub fn with_numbers(self) -> Self {
        self.write().has_numbers = true;
        self
    }

    /// Enable the column-visibility dropdown.
    pub fn with_columns_dropdown(self) -> Self {
        self.write().has_columns_dropdown = true;
        self
    }

    /// Keep the column header pinned while the body scrolls (default on).
    pub fn with_sticky_header(self, sticky: bool) -> Self {
        self.write().sticky_header = sticky;
        self
    }

    /// Read the row array from a non-default envelope property.
    pub fn with_data_key(self, data_key: impl Into<String>) -> Self {
        self.write().data_key = data_key.into();
        self
    }

    /// Install the filter definitions.
    pub fn with_filters(self, filters: Vec<Filter>) -> Self {
        {
            let mut inner = self.write();
            inner.panel = FilterPanel::new(filters.clone());
            inner.applied = AppliedFilters::new(filters);
        }
        self
    }

    /// Install the Actions dropdown entries.
    pub fn with_actions(self, actions: Vec<ActionItem>) -> Self {
        self.write().actions = actions;
        self
    }

    /// Install the Export dropdown entries.
    pub fn with_export_options(self, options: Vec<ActionItem>) -> Self {
        self.write().export_options = options;
        self
    }

    /// Set the handler receiving merged params on every interaction.
    pub fn on_param_change(self, f: impl Fn(&Params) + Send + Sync + 'static) -> Self {
        self.write().on_param_change = Some(Arc::new(f));
        self
    }

    /// Set the handler receiving the selection array when it changes.
    pub fn on_selected_items_change(self, f: impl Fn(&[RowKey]) + Send + Sync + 'static) -> Self {
        self.write().on_selected_items_change = Some(Arc::new(f));
        self
    }

    /// Set the handler receiving the formatted column list after
    /// visibility changes.
    pub fn on_columns_update(self, f: impl Fn(&[Column]) + Send + Sync + 'static) -> Self {
        self.write().on_columns_update = Some(Arc::new(f));
        self
    }

    /// Set the handler invoked with the full row object on row activation.
    pub fn on_row_click(self, f: impl Fn(&Value) + Send + Sync + 'static) -> Self {
        self.write().on_row_click = Some(Arc::new(f));
        self
    }

    /// Set the handler receiving raw filter deltas on apply/reset, before
    /// they are merged into the params emission.
    pub fn on_filter_change(self, f: impl Fn(&ParamDelta) + Send + Sync + 'static) -> Self {
        self.write().on_filter_change = Some(Arc::new(f));
        self
    }

    // =========================================================================
    // Host inputs
    // =========================================================================

    /// Replace the ambient params.
    ///
    /// Sort state and the search draft re-derive from the new params so a
    /// host that restores state from a URL stays in sync.
    pub fn set_params(&self, params: Params) {
        let mut inner = self.write();
        inner.sort = SortState::from_params(&params);
        inner.search.sync_from_params(&params);
        if inner.panel.is_open() {
            inner.panel.sync_from_params(&params);
        }
        inner.params = params;
        drop(inner);
        self.mark_dirty();
    }

    /// Replace the page of rows from a raw envelope value.
    pub fn set_data(&self, envelope: Value) {
        let mut inner = self.write();
        let data = DataSource::with_data_key(envelope, &inner.data_key);
        inner.data = data;
        inner.cursor = match inner.data.rows().len() {
            0 => None,
            len => Some(inner.cursor.unwrap_or(0).min(len - 1)),
        };
        drop(inner);
        self.mark_dirty();
    }

    /// Replace the page of rows from an already-built data source.
    pub fn set_data_source(&self, data: DataSource) {
        let mut inner = self.write();
        inner.data = data;
        inner.cursor = match inner.data.rows().len() {
            0 => None,
            len => Some(inner.cursor.unwrap_or(0).min(len - 1)),
        };
        drop(inner);
        self.mark_dirty();
    }

    /// Resynchronize the selection to a host-supplied default.
    ///
    /// The external value is the source of truth: the internal set is
    /// replaced with exactly these keys. No change notification fires.
    pub fn set_default_selected(&self, keys: Vec<RowKey>) {
        let mut inner = self.write();
        inner.selection.sync(&keys);
        inner.default_selected = keys;
        drop(inner);
        self.mark_dirty();
    }

    // =========================================================================
    // Derived views
    // =========================================================================

    /// Current ambient params.
    pub fn params(&self) -> Params {
        self.read().params.clone()
    }

    /// The formatted column list (non-action, persisted hidden applied).
    pub fn formatted_columns(&self) -> Vec<Column> {
        self.read().columns.formatted()
    }

    /// The visible column list the grid lays out.
    pub fn visible_columns(&self) -> Vec<Column> {
        self.read().columns.visible()
    }

    /// Currently selected keys, sorted.
    pub fn selected(&self) -> Vec<RowKey> {
        self.read().selection.selected()
    }

    /// The row keys of the current page, in row order.
    pub fn page_row_keys(&self) -> Vec<RowKey> {
        let inner = self.read();
        page_keys(&inner)
    }

    /// Tri-state summary of the current page's selection.
    pub fn page_selection_state(&self) -> TriState {
        let inner = self.read();
        let keys = page_keys(&inner);
        inner.selection.page_state(&keys)
    }

    /// Whether any filter holds an active value in the params.
    pub fn is_filtered(&self) -> bool {
        let inner = self.read();
        any_active(inner.panel.filters(), &inner.params)
    }

    /// Whether the header controls row renders at all.
    ///
    /// Omitted entirely (not merely hidden) unless search, the columns
    /// dropdown, export options, or filters are enabled/non-empty.
    pub fn header_bar_enabled(&self) -> bool {
        let inner = self.read();
        inner.has_search
            || (inner.has_columns_dropdown && !inner.table_key.is_empty())
            || !inner.export_options.is_empty()
            || !inner.panel.is_empty()
    }

    /// Column span of the empty-state row: visible data columns plus the
    /// checkbox and number columns when enabled.
    pub fn empty_span(&self) -> usize {
        let inner = self.read();
        inner.columns.visible().len()
            + usize::from(inner.has_checkbox)
            + usize::from(inner.has_numbers)
    }

    /// 1-based running number of a row on the current page.
    pub fn row_number(&self, row_index: usize) -> u64 {
        let inner = self.read();
        (inner.data.page() - 1) * inner.data.limit() + row_index as u64 + 1
    }

    /// The display matrix for export: a header of visible column names,
    /// then one row of strings per data row, using each column's export
    /// renderer when present and the displayed value otherwise.
    pub fn export_rows(&self) -> Vec<Vec<String>> {
        let inner = self.read();
        let columns = inner.columns.visible();
        let mut out = Vec::with_capacity(inner.data.rows().len() + 1);
        out.push(columns.iter().map(|column| column.name.clone()).collect());
        for row in inner.data.rows() {
            out.push(
                columns
                    .iter()
                    .map(|column| {
                        let value = lookup_path(row, &column.data_index)
                            .cloned()
                            .unwrap_or(Value::Null);
                        match &column.render_export {
                            Some(render) => render(&value, row),
                            None => display_value(&value),
                        }
                    })
                    .collect(),
            );
        }
        out
    }

    // =========================================================================
    // Interactions (shared by key and mouse handling)
    // =========================================================================

    /// Emit the params with a delta merged in.
    pub(super) fn emit_params<K: Into<String>>(
        &self,
        delta: impl IntoIterator<Item = (K, Value)>,
    ) {
        let (merged, handler) = {
            let inner = self.read();
            (inner.params.merged(delta), inner.on_param_change.clone())
        };
        debug!("table {} params change: {} keys", self.id, merged.len());
        if let Some(handler) = handler {
            handler(&merged);
        }
        self.mark_dirty();
    }

    /// Emit an already-merged params object.
    pub(super) fn emit_merged(&self, merged: &Params) {
        let handler = self.read().on_param_change.clone();
        debug!("table {} params change: {} keys", self.id, merged.len());
        if let Some(handler) = handler {
            handler(merged);
        }
        self.mark_dirty();
    }

    /// Emit a filter apply/reset: the raw delta to the filter handler,
    /// then the merged params to the params handler.
    pub(super) fn emit_filter(&self, delta: &ParamDelta, merged: &Params) {
        let handler = self.read().on_filter_change.clone();
        if let Some(handler) = handler {
            handler(delta);
        }
        self.emit_merged(merged);
    }

    /// Cycle sort on a column key if that column is sortable.
    pub fn toggle_sort(&self, column_key: &str) {
        let delta = {
            let mut inner = self.write();
            let sortable = inner
                .columns
                .formatted()
                .iter()
                .any(|column| column.key == column_key && column.sortable);
            if !sortable {
                return;
            }
            let field = inner
                .columns
                .formatted()
                .iter()
                .find(|column| column.key == column_key)
                .map(|column| column.data_index.clone())
                .unwrap_or_else(|| column_key.to_string());
            inner.sort.cycle(&field)
        };
        self.emit_params(delta);
    }

    /// Toggle one row's selection by page index.
    pub fn toggle_row(&self, row_index: usize) {
        let changed = {
            let mut inner = self.write();
            let keys = page_keys(&inner);
            match keys.get(row_index) {
                Some(key) => {
                    let checked = !inner.selection.is_selected(key);
                    inner.selection.select_one(key.clone(), checked)
                }
                None => false,
            }
        };
        if changed {
            self.notify_selection();
        }
        self.mark_dirty();
    }

    /// Select or deselect every row on the current page.
    pub fn select_all_on_page(&self, checked: bool) {
        let changed = {
            let mut inner = self.write();
            let keys = page_keys(&inner);
            inner.selection.select_all_on_page(&keys, checked)
        };
        if changed {
            self.notify_selection();
        }
        self.mark_dirty();
    }

    /// Toggle select-all based on the current tri-state: a fully selected
    /// page deselects, anything else selects.
    pub(super) fn toggle_select_all(&self) {
        let checked = self.page_selection_state() != TriState::Checked;
        self.select_all_on_page(checked);
    }

    /// Activate a row: invoke the host's row-click handler with the full
    /// row object.
    pub(super) fn click_row(&self, row_index: usize) {
        let (row, handler) = {
            let mut inner = self.write();
            if row_index < inner.data.rows().len() {
                inner.cursor = Some(row_index);
            }
            (
                inner.data.rows().get(row_index).cloned(),
                inner.on_row_click.clone(),
            )
        };
        if let (Some(row), Some(handler)) = (row, handler) {
            handler(&row);
        }
        self.mark_dirty();
    }

    /// Emit a page change.
    pub(super) fn change_page(&self, page: u64) {
        self.emit_params([(PARAM_PAGE, Value::from(page))]);
    }

    /// Emit a page-size change. Always resets to page 1.
    pub(super) fn change_limit(&self, limit: u64) {
        self.emit_params([
            (PARAM_LIMIT, Value::from(limit)),
            (PARAM_PAGE, Value::from(1)),
        ]);
    }

    /// Persist one column's visibility and notify the columns handler.
    pub(super) fn set_column_hidden(&self, column_key: &str, hidden: bool) {
        {
            let inner = self.read();
            if let Err(err) = inner.columns.toggle(column_key, hidden) {
                log::warn!("column toggle failed for {}: {err}", inner.table_key);
            }
        }
        self.notify_columns();
        self.mark_dirty();
    }

    /// Reset all column visibility to declared defaults.
    pub(super) fn reset_columns(&self) {
        {
            let inner = self.read();
            if let Err(err) = inner.columns.reset() {
                log::warn!("column reset failed for {}: {err}", inner.table_key);
            }
        }
        self.notify_columns();
        self.mark_dirty();
    }

    fn notify_columns(&self) {
        let (columns, handler) = {
            let inner = self.read();
            (inner.columns.formatted(), inner.on_columns_update.clone())
        };
        if let Some(handler) = handler {
            handler(&columns);
        }
    }

    /// Fire the selection handler when the set differs from the external
    /// default (deep equality guards against redundant notifications).
    fn notify_selection(&self) {
        let (selected, default, handler) = {
            let inner = self.read();
            (
                inner.selection.selected(),
                inner.default_selected.clone(),
                inner.on_selected_items_change.clone(),
            )
        };
        let mut sorted_default = default;
        sorted_default.sort();
        if selected == sorted_default {
            return;
        }
        if let Some(handler) = handler {
            handler(&selected);
        }
    }
}

impl std::fmt::Debug for DataTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataTable").field("id", &self.id).finish_non_exhaustive()
    }
}

/// Row keys of the current page, in row order.
pub(super) fn page_keys(inner: &DataTableInner) -> Vec<RowKey> {
    inner
        .data
        .rows()
        .iter()
        .filter_map(|row| lookup_path(row, &inner.row_key).and_then(RowKey::from_value))
        .collect()
}
