//! Pagination over the filtered view

use super::TermRecord;
use log::debug;

/// Number of terms shown per page
pub const PAGE_SIZE: usize = 5;

/// Current page position
///
/// Pages are numbered from 1. The pager never stores the filtered view
/// itself; callers pass the current item count so it stays a pure index
/// calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    current_page: usize,
    page_size: usize,
}

impl Pager {
    /// Create a pager on page 1 with the default page size
    pub fn new() -> Self {
        Self::with_page_size(PAGE_SIZE)
    }

    /// Create a pager with a custom page size (minimum 1)
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            current_page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Go back to the first page (used whenever the query changes)
    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Total page count for `count` items, reporting 1 for an empty set
    pub fn total_pages(&self, count: usize) -> usize {
        count.div_ceil(self.page_size).max(1)
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self, count: usize) -> bool {
        self.current_page < self.total_pages(count)
    }

    /// Advance one page; returns false (and does nothing) on the last page
    pub fn next(&mut self, count: usize) -> bool {
        if !self.has_next(count) {
            debug!("Next page ignored on page {}", self.current_page);
            return false;
        }
        self.current_page += 1;
        true
    }

    /// Go back one page; returns false (and does nothing) on page 1
    pub fn prev(&mut self) -> bool {
        if !self.has_prev() {
            debug!("Previous page ignored on page 1");
            return false;
        }
        self.current_page -= 1;
        true
    }

    /// Slice out the visible page of `items`
    pub fn view<'a>(&self, items: &'a [TermRecord]) -> PageView<'a> {
        let start = ((self.current_page - 1) * self.page_size).min(items.len());
        let end = (start + self.page_size).min(items.len());

        PageView {
            items: &items[start..end],
            first_index: start,
            current_page: self.current_page,
            total_pages: self.total_pages(items.len()),
            has_prev: self.has_prev(),
            has_next: self.has_next(items.len()),
            no_results: items.is_empty(),
        }
    }
}

impl Default for Pager {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything the presentation layer needs to draw one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView<'a> {
    /// Visible slice of the filtered view
    pub items: &'a [TermRecord],

    /// Index of `items[0]` within the filtered view
    pub first_index: usize,

    pub current_page: usize,
    pub total_pages: usize,

    /// Whether "previous" is enabled
    pub has_prev: bool,

    /// Whether "next" is enabled
    pub has_next: bool,

    /// Filtered view is empty: show the "no results" state instead of rows
    pub no_results: bool,
}

impl PageView<'_> {
    /// "Page X of Y" label
    pub fn label(&self) -> String {
        format!("Page {} of {}", self.current_page, self.total_pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(n: usize) -> Vec<TermRecord> {
        (0..n)
            .map(|i| TermRecord::new(format!("term{}", i), format!("definition {}", i)))
            .collect()
    }

    #[test]
    fn test_total_pages() {
        let pager = Pager::new();
        assert_eq!(pager.total_pages(0), 1);
        assert_eq!(pager.total_pages(1), 1);
        assert_eq!(pager.total_pages(5), 1);
        assert_eq!(pager.total_pages(6), 2);
        assert_eq!(pager.total_pages(12), 3);
    }

    #[test]
    fn test_twelve_items_three_pages() {
        let items = terms(12);
        let mut pager = Pager::new();

        assert!(pager.next(items.len()));
        assert!(pager.next(items.len()));
        let view = pager.view(&items);
        assert_eq!(view.current_page, 3);
        assert_eq!(view.total_pages, 3);
        assert_eq!(view.items.len(), 2);
        assert_eq!(view.first_index, 10);
        assert!(!view.has_next);
        assert!(view.has_prev);

        // Next on the last page is a no-op
        assert!(!pager.next(items.len()));
        assert_eq!(pager.current_page(), 3);
    }

    #[test]
    fn test_prev_disabled_on_first_page() {
        let items = terms(7);
        let mut pager = Pager::new();
        let view = pager.view(&items);
        assert!(!view.has_prev);
        assert!(view.has_next);
        assert!(!pager.prev());
        assert_eq!(pager.current_page(), 1);
    }

    #[test]
    fn test_empty_set_shows_no_results() {
        let items = terms(0);
        let pager = Pager::new();
        let view = pager.view(&items);
        assert!(view.no_results);
        assert!(view.items.is_empty());
        assert_eq!(view.total_pages, 1);
        assert_eq!(view.label(), "Page 1 of 1");
        assert!(!view.has_prev);
        assert!(!view.has_next);
    }

    #[test]
    fn test_pages_reconstruct_filtered_view() {
        for n in [0, 1, 4, 5, 6, 10, 13] {
            let items = terms(n);
            let mut pager = Pager::new();
            let mut rebuilt = Vec::new();
            loop {
                let view = pager.view(&items);
                assert!(view.items.len() <= PAGE_SIZE);
                rebuilt.extend_from_slice(view.items);
                if !pager.next(items.len()) {
                    break;
                }
            }
            assert_eq!(rebuilt, items, "n = {}", n);
            assert_eq!(pager.current_page(), pager.total_pages(n));
        }
    }

    #[test]
    fn test_reset() {
        let mut pager = Pager::new();
        pager.next(20);
        pager.reset();
        assert_eq!(pager.current_page(), 1);
    }
}
