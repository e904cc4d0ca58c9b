use lattice::widgets::pagination::{PageItem, next_page, page_items, prev_page};

fn pages(items: &[PageItem]) -> Vec<Option<u64>> {
    items
        .iter()
        .map(|item| match item {
            PageItem::Page(p) => Some(*p),
            PageItem::Ellipsis => None,
        })
        .collect()
}

#[test]
fn test_middle_page_windows_both_sides() {
    let items = page_items(5, 9);
    assert_eq!(
        pages(&items),
        [
            Some(1),
            None,
            Some(4),
            Some(5),
            Some(6),
            None,
            Some(9),
        ]
    );
}

#[test]
fn test_small_page_count_has_no_ellipsis() {
    assert_eq!(pages(&page_items(1, 3)), [Some(1), Some(2), Some(3)]);
    assert_eq!(pages(&page_items(2, 3)), [Some(1), Some(2), Some(3)]);
}

#[test]
fn test_single_page() {
    assert_eq!(pages(&page_items(1, 1)), [Some(1)]);
}

#[test]
fn test_near_start_elides_tail_only() {
    assert_eq!(
        pages(&page_items(2, 10)),
        [Some(1), Some(2), Some(3), None, Some(10)]
    );
}

#[test]
fn test_near_end_elides_head_only() {
    assert_eq!(
        pages(&page_items(9, 10)),
        [Some(1), None, Some(8), Some(9), Some(10)]
    );
}

#[test]
fn test_prev_next_guards() {
    assert_eq!(prev_page(1), None);
    assert_eq!(prev_page(2), Some(1));
    assert_eq!(next_page(3, 3), None);
    assert_eq!(next_page(2, 3), Some(3));
}
