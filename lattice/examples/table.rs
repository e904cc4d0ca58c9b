//! Data table example - a params-driven grid with a simulated host.
//!
//! The table never fetches anything itself: it emits merged params on
//! every interaction, and this example plays the host application's
//! role, "fetching" a page from an in-memory dataset and passing it
//! back down.
//!
//! Controls:
//! - j/k or arrows: Move the cursor row
//! - Space: Toggle row selection, a: toggle select-all-on-page
//! - Left/Right: Previous/next page
//! - /: Search (Enter submits), f: Filters, c: Columns, l: Page size
//! - Mouse: Click headers to sort, chips to remove, footer to paginate
//! - q: Quit

use std::fs::File;
use std::sync::mpsc;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use log::LevelFilter;
use serde_json::{Value, json};
use simplelog::{Config, WriteLogger};

use lattice::prelude::*;

// =============================================================================
// Simulated API
// =============================================================================

fn dataset() -> Vec<Value> {
    let cities = ["Oslo", "Bergen", "Trondheim", "Stavanger"];
    let statuses = ["open", "closed"];
    (1..=157)
        .map(|i: i64| {
            json!({
                "id": i.to_string(),
                "name": format!("Record {i:03}"),
                "status": statuses[(i % 2) as usize],
                "amount": (i * 17) % 1000 - 500,
                "address": {"city": cities[(i % 4) as usize]},
            })
        })
        .collect()
}

/// Apply search/filter/sort/pagination params to the dataset and build
/// the pagination envelope a real backend would return.
fn fetch(params: &Params) -> Value {
    let mut rows = dataset();

    if let Some(search) = params.get_str("search") {
        let needle = search.to_lowercase();
        rows.retain(|row| {
            row["name"]
                .as_str()
                .is_some_and(|name| name.to_lowercase().contains(&needle))
        });
    }
    if params.is_active("status") {
        let wanted = params.get("status").cloned().unwrap_or(Value::Null);
        rows.retain(|row| match &wanted {
            Value::Array(values) => values.contains(&row["status"]),
            scalar => &row["status"] == scalar,
        });
    }
    if let Some(field) = params.get_str("sortField") {
        let descending = params.get_str("sortOrder") == Some("desc");
        rows.sort_by(|a, b| {
            let (a, b) = (&a[field], &b[field]);
            let ordering = match (a.as_i64(), b.as_i64()) {
                (Some(a), Some(b)) => a.cmp(&b),
                _ => a.to_string().cmp(&b.to_string()),
            };
            if descending { ordering.reverse() } else { ordering }
        });
    }

    let limit = params.limit();
    let total = rows.len() as u64;
    let total_pages = total.div_ceil(limit);
    let page = params.page().min(total_pages.max(1));
    let start = ((page - 1) * limit) as usize;
    let docs: Vec<Value> = rows.into_iter().skip(start).take(limit as usize).collect();

    json!({
        "docs": docs,
        "page": page,
        "limit": limit,
        "totalPages": total_pages,
        "total": total,
        "hasPrevPage": page > 1,
        "hasNextPage": page < total_pages,
    })
}

// =============================================================================
// Main
// =============================================================================

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Ok(file) = File::create("table-example.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, Config::default(), file);
    }

    let columns = vec![
        Column::new("id", "ID", 6).sortable(),
        Column::new("name", "Name", 24).sortable(),
        Column::new("status", "Status", 10),
        Column::new("amount", "Amount", 10)
            .align(Alignment::Right)
            .sortable(),
        Column::new("city", "City", 16).data_index("address.city").hidden(),
    ];
    let filters = vec![
        Filter::new("status", "Status")
            .options(vec![
                SelectOption::new("open", "Open"),
                SelectOption::new("closed", "Closed"),
            ])
            .multi(),
    ];

    let (param_tx, param_rx) = mpsc::channel::<Params>();
    let store = KeyValueStore::in_memory();

    let table = DataTable::new("example", columns, "id", &store)
        .with_search()
        .with_pagination()
        .with_checkbox()
        .with_numbers()
        .with_columns_dropdown()
        .with_filters(filters)
        .on_param_change(move |params| {
            let _ = param_tx.send(params.clone());
        })
        .on_selected_items_change(|keys| log::debug!("selected: {keys:?}"))
        .on_row_click(|row| log::debug!("activated row {}", row["id"]));

    let params = Params::new();
    table.set_params(params.clone());
    table.set_data(fetch(&params));

    let mut terminal = ratatui::init();
    let _ = execute!(std::io::stdout(), event::EnableMouseCapture);

    loop {
        terminal.draw(|frame| table.render(frame, frame.area()))?;

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                let result = table.handle_key(&key);
                if result == EventResult::Ignored
                    && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
                {
                    break;
                }
                if result == EventResult::Ignored {
                    match key.code {
                        KeyCode::Char('j') => {
                            table.handle_key(&KeyCode::Down.into());
                        }
                        KeyCode::Char('k') => {
                            table.handle_key(&KeyCode::Up.into());
                        }
                        _ => {}
                    }
                }
            }
            Event::Mouse(mouse) => {
                table.handle_mouse(&mouse);
            }
            Event::Resize(..) => {}
            _ => {}
        }

        // Play the host: every emitted params object triggers a refetch.
        while let Ok(params) = param_rx.try_recv() {
            table.set_params(params.clone());
            table.set_data(fetch(&params));
        }
    }

    let _ = execute!(std::io::stdout(), event::DisableMouseCapture);
    ratatui::restore();
    Ok(())
}
