//! Pagination utilities for the service layer.
//!
//! Page size is fixed; callers only choose which 1-based page to read.

use serde::Serialize;

/// Rows per page for every listing.
pub const PER_PAGE: u64 = 10;

/// Pagination parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page index
    pub page: u64,
}

impl Pagination {
    pub fn new(page: u64) -> Self { Self { page } }

    /// 1-based page number with 0 clamped to 1.
    pub fn current_page(self) -> u64 { self.page.max(1) }

    /// Zero-based page index and page size, as the paginator expects them.
    pub fn normalize(self) -> (u64, u64) {
        (self.current_page() - 1, PER_PAGE)
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 1 } }
}

/// One page of results plus the numbers a client needs to walk the rest.
#[derive(Clone, Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: u64,
    pub per_page: u64,
    pub total: u64,
    pub last_page: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, pagination: Pagination, total: u64) -> Self {
        let last_page = total.div_ceil(PER_PAGE).max(1);
        Self { items, current_page: pagination.current_page(), per_page: PER_PAGE, total, last_page }
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            current_page: self.current_page,
            per_page: self.per_page,
            total: self.total,
            last_page: self.last_page,
        }
    }
}
