//! Page-number pagination math shared by the list endpoints.
//!
//! Pages are 1-indexed. `page_size` is clamped to `[1, 100]` so a caller
//! cannot request unbounded result sets.

/// Default page size when the caller does not pass one.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Upper bound on `page_size`.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Clamp a requested page size into the allowed range.
pub fn clamp_page_size(page_size: Option<i64>) -> i64 {
    page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
}

/// Clamp a requested page number (1-indexed, minimum 1).
pub fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

/// SQL OFFSET for a 1-indexed page.
pub fn offset(page: i64, page_size: i64) -> i64 {
    (page - 1) * page_size
}

/// `ceil(total / page_size)`, with `0` when there are no matches.
pub fn total_pages(total: i64, page_size: i64) -> i64 {
    if total == 0 {
        0
    } else {
        (total + page_size - 1) / page_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_matches_means_zero_pages() {
        assert_eq!(total_pages(0, 10), 0);
    }

    #[test]
    fn partial_last_page_rounds_up() {
        // 7 items at page size 3: pages of 3, 3, 1.
        assert_eq!(total_pages(7, 3), 3);
    }

    #[test]
    fn exact_division() {
        assert_eq!(total_pages(30, 10), 3);
    }

    #[test]
    fn single_item() {
        assert_eq!(total_pages(1, 100), 1);
    }

    #[test]
    fn page_size_clamped_to_bounds() {
        assert_eq!(clamp_page_size(None), DEFAULT_PAGE_SIZE);
        assert_eq!(clamp_page_size(Some(0)), 1);
        assert_eq!(clamp_page_size(Some(-5)), 1);
        assert_eq!(clamp_page_size(Some(1000)), MAX_PAGE_SIZE);
        assert_eq!(clamp_page_size(Some(25)), 25);
    }

    #[test]
    fn page_is_one_indexed() {
        assert_eq!(clamp_page(None), 1);
        assert_eq!(clamp_page(Some(0)), 1);
        assert_eq!(clamp_page(Some(4)), 4);
        assert_eq!(offset(1, 10), 0);
        assert_eq!(offset(3, 10), 20);
    }
}
