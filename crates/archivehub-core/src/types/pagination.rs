//! Offset pagination shared by every list operation.

use serde::{Deserialize, Serialize};

/// Page size used when none (or a non-positive one) is given.
pub const DEFAULT_PAGE_SIZE: u64 = 10;
/// Largest page size a caller may ask for.
pub const MAX_PAGE_SIZE: u64 = 100;

/// A normalized page selector: `page >= 1`, `1 <= page_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u64,
    /// Rows per page.
    pub page_size: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

impl PageRequest {
    /// Clamp `page` and `page_size` into the valid range.
    pub fn new(page: u64, page_size: u64) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Normalize caller-supplied values.
    ///
    /// Absent or non-positive values become page 1 and `default_size`;
    /// the size is capped at `max_size`.
    pub fn from_raw(
        page: Option<i64>,
        page_size: Option<i64>,
        default_size: u64,
        max_size: u64,
    ) -> Self {
        let positive = |v: Option<i64>| v.filter(|n| *n > 0).map(|n| n as u64);
        Self {
            page: positive(page).unwrap_or(1),
            page_size: positive(page_size)
                .unwrap_or(default_size.max(1))
                .min(max_size.max(1)),
        }
    }

    /// Rows to skip.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }

    /// Rows to return.
    pub fn limit(&self) -> u64 {
        self.page_size
    }

    /// [`offset`](Self::offset) as a SQL `OFFSET` bind, clamped to `i64::MAX`.
    pub fn sql_offset(&self) -> i64 {
        i64::try_from(self.offset()).unwrap_or(i64::MAX)
    }

    /// [`limit`](Self::limit) as a SQL `LIMIT` bind, clamped to `i64::MAX`.
    pub fn sql_limit(&self) -> i64 {
        i64::try_from(self.limit()).unwrap_or(i64::MAX)
    }
}

/// One page of results plus totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    /// Rows on this page.
    pub items: Vec<T>,
    /// 1-based page number.
    pub page: u64,
    /// Requested rows per page.
    pub page_size: u64,
    /// Rows across all pages.
    pub total_items: u64,
    /// Page count; at least 1 even when there are no rows.
    pub total_pages: u64,
    /// Whether a later page exists.
    pub has_next: bool,
    /// Whether an earlier page exists.
    pub has_previous: bool,
}

impl<T> PageResponse<T> {
    /// Wrap the rows fetched for `request` out of `total_items`.
    pub fn new(items: Vec<T>, request: &PageRequest, total_items: u64) -> Self {
        let total_pages = total_items.div_ceil(request.page_size.max(1)).max(1);
        Self {
            items,
            page: request.page,
            page_size: request.page_size,
            total_items,
            total_pages,
            has_next: request.page < total_pages,
            has_previous: request.page > 1,
        }
    }
}
