//! Pagination arithmetic for the table footer.

/// Default page size when the host supplies none.
pub const DEFAULT_LIMIT: u64 = 50;

/// Default page size when rendering item grids rather than tables.
pub const DEFAULT_ITEMS_LIMIT: u64 = 12;

/// The rows-per-page options offered by the footer's limit select.
pub const DEFAULT_LIMIT_OPTIONS: [u64; 4] = [10, 20, 50, 100];

/// One slot in the rendered page-navigation strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(u64),
    Ellipsis,
}

/// The windowed list of page items around the current page.
///
/// Always shows the first and last page; pages within one step of the
/// current page; and ellipses for the gaps. Page counts of zero or one
/// produce a bare `[1]`-style strip with no ellipsis.
pub fn page_items(current_page: u64, total_pages: u64) -> Vec<PageItem> {
    const VISIBLE_RANGE: u64 = 1;

    let mut items = Vec::new();
    items.push(PageItem::Page(1));

    if current_page.saturating_sub(VISIBLE_RANGE) > 2 {
        items.push(PageItem::Ellipsis);
    }

    let window_start = current_page.saturating_sub(VISIBLE_RANGE).max(2);
    let window_end = (current_page + VISIBLE_RANGE).min(total_pages.saturating_sub(1));
    for page in window_start..=window_end {
        items.push(PageItem::Page(page));
    }

    if current_page + VISIBLE_RANGE < total_pages.saturating_sub(1) {
        items.push(PageItem::Ellipsis);
    }

    if total_pages > 1 {
        items.push(PageItem::Page(total_pages));
    }

    items
}

/// The previous page if one exists.
pub fn prev_page(current_page: u64) -> Option<u64> {
    (current_page > 1).then(|| current_page - 1)
}

/// The next page if one exists.
pub fn next_page(current_page: u64, total_pages: u64) -> Option<u64> {
    (current_page < total_pages).then(|| current_page + 1)
}
