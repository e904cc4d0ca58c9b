//! Column definitions for the data table.

use std::sync::Arc;

use ratatui::text::Line;
use serde_json::Value;

/// Horizontal alignment for column content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// What a column holds.
///
/// `Action` columns carry per-row controls owned by the host; the grid
/// renderer only lays out `Data` columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnKind {
    #[default]
    Data,
    Action,
}

/// Custom cell renderer: `(value at data_index, whole row) -> Line`.
pub type CellRender = Arc<dyn Fn(&Value, &Value) -> Line<'static> + Send + Sync>;

/// Custom export renderer: `(value at data_index, whole row) -> String`.
pub type ExportRender = Arc<dyn Fn(&Value, &Value) -> String + Send + Sync>;

/// Column configuration.
///
/// Columns define the structure of the table: a unique key, the dot-path
/// into the row object the cell reads, header text, width, and behavior
/// flags. Definitions are immutable inputs per render pass — only the
/// `hidden` flag is overridden from persisted state.
///
/// # Examples
///
/// ```ignore
/// let columns = vec![
///     Column::new("id", "ID", 8),
///     Column::new("name", "Name", 30).sortable(),
///     Column::new("city", "City", 20).data_index("address.city").hidden(),
/// ];
/// ```
#[derive(Clone)]
pub struct Column {
    /// Unique key within one column set.
    pub key: String,
    /// Dot-path into the row object.
    pub data_index: String,
    /// Column header text.
    pub name: String,
    /// Column width in terminal columns (fixed).
    pub width: u16,
    /// Horizontal alignment.
    pub align: Alignment,
    /// Data vs. action column.
    pub kind: ColumnKind,
    /// Whether clicking the header cycles sort on this column.
    pub sortable: bool,
    /// Hidden-by-default flag; overridden by the persisted store.
    pub hidden: bool,
    /// Custom cell renderer.
    pub render: Option<CellRender>,
    /// Custom export renderer.
    pub render_export: Option<ExportRender>,
}

impl Column {
    /// Create a data column. The data index defaults to the key.
    pub fn new(key: impl Into<String>, name: impl Into<String>, width: u16) -> Self {
        let key = key.into();
        Self {
            data_index: key.clone(),
            key,
            name: name.into(),
            width,
            align: Alignment::Left,
            kind: ColumnKind::Data,
            sortable: false,
            hidden: false,
            render: None,
            render_export: None,
        }
    }

    /// Set the dot-path the cell reads from the row.
    pub fn data_index(mut self, path: impl Into<String>) -> Self {
        self.data_index = path.into();
        self
    }

    /// Set the column alignment.
    pub fn align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    /// Make the column sortable.
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Hide the column by default.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Mark as an action column (excluded from the rendered grid).
    pub fn action(mut self) -> Self {
        self.kind = ColumnKind::Action;
        self
    }

    /// Set a custom cell renderer.
    pub fn render(
        mut self,
        f: impl Fn(&Value, &Value) -> Line<'static> + Send + Sync + 'static,
    ) -> Self {
        self.render = Some(Arc::new(f));
        self
    }

    /// Set a custom export renderer.
    pub fn render_export(
        mut self,
        f: impl Fn(&Value, &Value) -> String + Send + Sync + 'static,
    ) -> Self {
        self.render_export = Some(Arc::new(f));
        self
    }
}

impl std::fmt::Debug for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("data_index", &self.data_index)
            .field("name", &self.name)
            .field("width", &self.width)
            .field("align", &self.align)
            .field("kind", &self.kind)
            .field("sortable", &self.sortable)
            .field("hidden", &self.hidden)
            .field("render", &self.render.is_some())
            .field("render_export", &self.render_export.is_some())
            .finish()
    }
}
