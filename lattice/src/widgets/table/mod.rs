//! The composable data table.
//!
//! `DataTable` composes search, a filter popover, applied-filter chips,
//! column-visibility toggles, sorting, row selection, and pagination into
//! one params-driven view:
//!
//! - the host owns `params` and the fetched page of rows;
//! - every interaction (sort click, filter apply, page change, …) emits
//!   a merged params copy upward via `on_param_change`;
//! - the host refetches and passes a new page back down.
//!
//! Params are always additively merged, never replaced wholesale, so
//! unrelated keys survive every interaction.
//!
//! # Example
//!
//! ```ignore
//! use lattice::prelude::*;
//!
//! let store = KeyValueStore::open_default()?;
//! let table = DataTable::new("users", columns, "id", &store)
//!     .with_search()
//!     .with_pagination()
//!     .with_checkbox()
//!     .with_numbers()
//!     .with_columns_dropdown()
//!     .with_filters(vec![
//!         Filter::new("status", "Status").options(vec![
//!             SelectOption::new("open", "Open"),
//!             SelectOption::new("closed", "Closed"),
//!         ]),
//!     ])
//!     .on_param_change(move |params| tx.send(params.clone()).ok());
//!
//! table.set_params(params);
//! table.set_data(serde_json::json!({
//!     "docs": [{"id": "1", "name": "A"}],
//!     "page": 1, "limit": 10, "totalPages": 1, "total": 1,
//! }));
//! ```

mod column;
mod envelope;
mod events;
mod format;
mod render;
mod sort;
mod state;

pub use column::{Alignment, CellRender, Column, ColumnKind, ExportRender};
pub use envelope::{DEFAULT_DATA_KEY, DataSource};
pub use format::ColumnSet;
pub use sort::{PARAM_SORT_FIELD, PARAM_SORT_ORDER, SortOrder, SortState};
pub use state::{
    ColumnsHandler, DataTable, FilterChangeHandler, ParamChangeHandler, RowClickHandler,
    SelectionHandler, TableId,
};
