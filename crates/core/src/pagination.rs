//! Page descriptors for list endpoints.
//!
//! Page numbers are 1-based. Page sizes default to [`DEFAULT_PAGE_SIZE`] and
//! are clamped to [`MAX_PAGE_SIZE`] so a single request cannot pull an
//! unbounded number of rows.

/// Rows per page when the caller does not ask for a size.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Hard upper bound on rows per page.
pub const MAX_PAGE_SIZE: i64 = 50;

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// A request-scoped, already-clamped page descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Build a page descriptor from raw query values.
    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            page_size: clamp_limit(page_size, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE),
        }
    }

    /// SQL `LIMIT` for this page.
    pub fn limit(&self) -> i64 {
        self.page_size
    }

    /// SQL `OFFSET` for this page. Saturates instead of overflowing for
    /// absurd page numbers; such pages are simply empty.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_page_of_default_size() {
        let page = PageRequest::new(None, None);
        assert_eq!(page, PageRequest::default());
        assert_eq!(page.limit(), DEFAULT_PAGE_SIZE);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn page_size_is_clamped_to_maximum() {
        let page = PageRequest::new(Some(1), Some(10_000));
        assert_eq!(page.page_size, MAX_PAGE_SIZE);
    }

    #[test]
    fn non_positive_values_are_clamped() {
        let page = PageRequest::new(Some(0), Some(0));
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 1);

        let page = PageRequest::new(Some(-4), Some(-1));
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 1);
    }

    #[test]
    fn offset_skips_previous_pages() {
        let page = PageRequest::new(Some(3), Some(20));
        assert_eq!(page.offset(), 40);
        assert_eq!(page.limit(), 20);
    }

    #[test]
    fn huge_page_number_does_not_overflow() {
        let page = PageRequest::new(Some(i64::MAX), Some(MAX_PAGE_SIZE));
        assert_eq!(page.offset(), i64::MAX);
    }
}
