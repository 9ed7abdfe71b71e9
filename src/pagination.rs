//! Fixed-size pagination with paginator-style page clamping.
//!
//! Out-of-range or unparseable page numbers never error: anything below the
//! first page clamps to 1, anything past the end clamps to the last page.

use serde::Serialize;

/// Mailbox listings always show 10 items per page.
pub const PAGE_SIZE: i64 = 10;

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub total_pages: i64,
    pub total_items: i64,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            total_pages: 1,
            total_items: 0,
        }
    }
}

/// Number of pages for `total` items. An empty set still has one (empty) page.
pub fn total_pages(total: i64) -> i64 {
    ((total + PAGE_SIZE - 1) / PAGE_SIZE).max(1)
}

/// Clamp a requested 1-based page number into `[1, total_pages(total)]`.
/// `None` (absent or unparseable) means page 1.
pub fn clamp_page(requested: Option<i64>, total: i64) -> i64 {
    requested.unwrap_or(1).clamp(1, total_pages(total))
}

/// SQL OFFSET for a clamped page.
pub fn offset(page: i64) -> i64 {
    (page - 1) * PAGE_SIZE
}
