//! Pagination helpers for in-memory lists
//!
//! Pages are 1-indexed for consumers.

use serde::{Deserialize, Serialize};

/// Default page size if not configured
pub const DEFAULT_PAGE_SIZE: usize = 10;
/// Maximum allowed page size
pub const MAX_PAGE_SIZE: usize = 100;
pub const FIRST_PAGE: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: usize,
    pub per_page: usize,
}

impl PageRequest {
    pub fn new(page: usize, per_page: usize) -> Self {
        Self { page, per_page }
    }

    /// Index of the first item on the page
    pub fn offset(&self) -> usize {
        (self.page.max(FIRST_PAGE) - 1) * self.limit()
    }

    pub fn limit(&self) -> usize {
        self.per_page.clamp(1, MAX_PAGE_SIZE)
    }

    /// Slices `[(page-1)*size, page*size)` out of `items`; out-of-range pages
    /// yield an empty slice.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.offset().min(items.len());
        let end = (start + self.limit()).min(items.len());
        &items[start..end]
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: FIRST_PAGE,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Number of pages needed for `total` items; zero when there are none
pub fn total_pages(total: usize, per_page: usize) -> usize {
    total.div_ceil(per_page.clamp(1, MAX_PAGE_SIZE))
}

/// Pagination metadata shown under a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// Current page (1-indexed)
    pub page: usize,
    /// Items per page
    pub per_page: usize,
    /// Total number of items
    pub total: usize,
    /// Total number of pages
    pub total_pages: usize,
    /// Whether there's a next page
    pub has_next: bool,
    /// Whether there's a previous page
    pub has_prev: bool,
}

impl PageMeta {
    pub fn new(page: usize, per_page: usize, total: usize) -> Self {
        let total_pages = total_pages(total, per_page);
        Self {
            page,
            per_page,
            total,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > FIRST_PAGE,
        }
    }

    /// 1-indexed range of items on this page, for "Showing 11-20 of 42"
    pub fn item_range(&self) -> Option<(usize, usize)> {
        if self.total == 0 {
            return None;
        }
        let request = PageRequest::new(self.page, self.per_page);
        let first = request.offset() + 1;
        let last = (request.offset() + request.limit()).min(self.total);
        (first <= last).then_some((first, last))
    }
}
