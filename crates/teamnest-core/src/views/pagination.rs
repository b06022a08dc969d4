//! Client-side pagination state

use serde::Serialize;

/// Current page (1-based) and page size for a filtered list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: usize,
    page_size: usize,
}

/// One page of a list plus the numbers a pager needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl Pagination {
    /// Start on page 1; a zero page size is treated as 1
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self, total_items: usize) -> usize {
        total_items.div_ceil(self.page_size)
    }

    /// Jump to a page, clamped to `[1, total_pages]`
    pub fn set_page(&mut self, page: usize, total_items: usize) {
        self.page = page.min(self.total_pages(total_items)).max(1);
    }

    /// Change the page size and go back to page 1
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 1;
    }

    /// Go back to page 1 when the list shrank below the current page
    pub fn sync(&mut self, total_items: usize) {
        let total_pages = self.total_pages(total_items);
        if total_pages > 0 && self.page > total_pages {
            self.page = 1;
        }
    }

    /// Slice out the current page
    pub fn paginate<T: Clone>(&self, items: &[T]) -> Page<T> {
        let start = (self.page - 1).saturating_mul(self.page_size).min(items.len());
        let end = start.saturating_add(self.page_size).min(items.len());
        Page {
            items: items[start..end].to_vec(),
            current_page: self.page,
            page_size: self.page_size,
            total_items: items.len(),
            total_pages: self.total_pages(items.len()),
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_rounds_up() {
        let pager = Pagination::new(6);
        assert_eq!(pager.total_pages(0), 0);
        assert_eq!(pager.total_pages(6), 1);
        assert_eq!(pager.total_pages(7), 2);
    }

    #[test]
    fn test_set_page_clamps() {
        let mut pager = Pagination::new(10);
        pager.set_page(9, 25);
        assert_eq!(pager.page(), 3);
        pager.set_page(0, 25);
        assert_eq!(pager.page(), 1);
        pager.set_page(4, 0);
        assert_eq!(pager.page(), 1);
    }

    #[test]
    fn test_page_size_change_resets_page() {
        let mut pager = Pagination::new(10);
        pager.set_page(3, 30);
        pager.set_page_size(5);
        assert_eq!(pager.page(), 1);
        assert_eq!(pager.page_size(), 5);
    }

    #[test]
    fn test_sync_resets_when_list_shrinks() {
        let mut pager = Pagination::new(5);
        pager.set_page(4, 20);
        pager.sync(8);
        assert_eq!(pager.page(), 1);

        pager.set_page(2, 8);
        pager.sync(0);
        assert_eq!(pager.page(), 2);
    }

    #[test]
    fn test_paginate_last_partial_page() {
        let items: Vec<u32> = (1..=13).collect();
        let mut pager = Pagination::new(6);
        pager.set_page(3, items.len());

        let page = pager.paginate(&items);
        assert_eq!(page.items, vec![13]);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_items, 13);
    }

    #[test]
    fn test_paginate_empty() {
        let page = Pagination::new(6).paginate::<u32>(&[]);
        assert!(page.items.is_empty());
        assert_eq!(page.current_page, 1);
        assert_eq!(page.total_pages, 0);
    }
}
