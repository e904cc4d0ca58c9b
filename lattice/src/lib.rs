//! Composable data-table components for ratatui.
//!
//! The host application owns the ambient `params` (page, limit, sort,
//! search, filters) and the data fetching; this library renders the
//! fetched page and funnels every interaction back up as a merged params
//! copy. View state that should survive restarts — column visibility,
//! date ranges — persists through an injectable key-value store.

pub mod params;
pub mod store;
pub mod utils;
pub mod widgets;

pub mod prelude {
    pub use crate::params::{PARAM_LIMIT, PARAM_PAGE, PARAM_SEARCH, Params};
    pub use crate::store::{
        ColumnVisibilityStore, DateRange, DateRangeStore, KeyValueStore, MemoryBackend,
        SqliteBackend, StoreBackend, StoreError,
    };
    pub use crate::widgets::actions::ActionItem;
    pub use crate::widgets::events::EventResult;
    pub use crate::widgets::filters::{
        AppliedFilters, Chip, Filter, FilterPanel, ParamDelta, SearchBox,
    };
    pub use crate::widgets::pagination::{DEFAULT_LIMIT, PageItem, page_items};
    pub use crate::widgets::select::{Select, SelectOption};
    pub use crate::widgets::selection::{RowKey, Selection, TriState};
    pub use crate::widgets::table::{
        Alignment, Column, ColumnKind, ColumnSet, DataSource, DataTable, SortOrder, SortState,
    };
}
