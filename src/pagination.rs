//! Page/limit normalisation shared by the store and the list endpoint.

use serde::Serialize;

/// Page size used when the caller asks for none or for a non-positive one.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 10;

/// A normalised page request. Construction never fails: out-of-range values
/// are clamped instead of rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// One-based page number.
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    /// Clamp raw query values: `page < 1` becomes 1 and `per_page < 1`
    /// becomes [`DEFAULT_ITEMS_PER_PAGE`].
    pub fn new(page: i64, per_page: i64) -> Self {
        let page = if page < 1 { 1 } else { page as usize };
        let per_page = if per_page < 1 {
            DEFAULT_ITEMS_PER_PAGE
        } else {
            per_page as usize
        };
        Self { page, per_page }
    }

    /// Same as [`Self::new`] for optional query parameters.
    pub fn from_query(page: Option<i64>, per_page: Option<i64>) -> Self {
        Self::new(page.unwrap_or(1), per_page.unwrap_or(0))
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.per_page)
    }

    /// Total number of pages needed for `total` items.
    pub fn total_pages(&self, total: usize) -> usize {
        total.div_ceil(self.per_page)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_ITEMS_PER_PAGE,
        }
    }
}

/// One page of results together with the numbers needed to render a pager.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, pagination: Pagination, total_items: usize) -> Self {
        Self {
            items,
            page: pagination.page,
            per_page: pagination.per_page,
            total_items,
            total_pages: pagination.total_pages(total_items),
        }
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}
