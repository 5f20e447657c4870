//! Shared response envelopes.

use serde::Serialize;

/// Simple `{"message": ...}` acknowledgment body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Page-number pagination envelope used by every paginated listing.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    /// Number of items on this page (not the overall total).
    pub total_in_page: i64,
    pub page: i64,
    pub page_size: i64,
    /// `ceil(total / page_size)`, `0` when nothing matched.
    pub total_pages: i64,
    pub items: Vec<T>,
}

impl<T> Paginated<T> {
    /// Assemble an envelope from a fetched page and the overall count.
    pub fn new(items: Vec<T>, page: i64, page_size: i64, total: i64) -> Self {
        Self {
            total_in_page: items.len() as i64,
            page,
            page_size,
            total_pages: ru_core::pagination::total_pages(total, page_size),
            items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_reports_page_math() {
        let page: Paginated<i32> = Paginated::new(vec![1, 2, 3], 1, 3, 7);
        assert_eq!(page.total_in_page, 3);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn empty_result_has_zero_pages() {
        let page: Paginated<i32> = Paginated::new(Vec::new(), 1, 10, 0);
        assert_eq!(page.total_in_page, 0);
        assert_eq!(page.total_pages, 0);
    }
}
