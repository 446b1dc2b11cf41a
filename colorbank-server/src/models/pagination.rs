//! Fixed-size, 1-indexed page math

/// A requested page over a store partitioned into `per_page` chunks.
///
/// Unlike a clamping paginator, out-of-range pages are kept as requested so
/// the caller can report them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Page number (1-indexed, may be out of range)
    pub page: i64,
    /// Items per page (at least 1)
    pub per_page: u32,
}

impl Pagination {
    pub fn new(page: i64, per_page: u32) -> Self {
        Self {
            page,
            per_page: per_page.max(1),
        }
    }

    /// Number of pages needed for `total` items: `ceil(total / per_page)`.
    pub fn page_count(&self, total: i64) -> i64 {
        let per_page = i64::from(self.per_page);
        (total.max(0) + per_page - 1) / per_page
    }

    /// Whether this page exists for `total` items.
    pub fn contains(&self, total: i64) -> bool {
        self.page >= 1 && self.page <= self.page_count(total)
    }

    /// SQL OFFSET for this page. Only meaningful when [`contains`](Self::contains) holds.
    pub fn offset(&self) -> i64 {
        (self.page - 1) * i64::from(self.per_page)
    }

    /// SQL LIMIT value.
    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }
}
