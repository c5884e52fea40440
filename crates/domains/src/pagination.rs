//! # Pagination
//!
//! Fixed-size pages with clamping semantics: out-of-range requests never
//! error, they land on the nearest valid page, and an empty result set is
//! one empty page rather than zero pages.

use serde::Serialize;

/// Posts per feed page.
pub const FEED_PAGE_SIZE: u64 = 5;

/// One page of results plus the metadata a pager needs.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number after clamping.
    pub number: u64,
    pub total_pages: u64,
    pub total_items: u64,
    pub has_prev: bool,
    pub has_next: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, number: u64, total_pages: u64, total_items: u64) -> Self {
        Self {
            items,
            number,
            total_pages,
            total_items,
            has_prev: number > 1,
            has_next: number < total_pages,
        }
    }

    /// Page 1 of 1 with nothing on it.
    pub fn empty() -> Self {
        Self::new(Vec::new(), 1, 1, 0)
    }
}

/// Parses a raw `page` query parameter.
///
/// Absent, non-numeric, zero, and negative values all mean page 1.
pub fn parse_page_param(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .map(|n| if n < 1 { 1 } else { n as u64 })
        .unwrap_or(1)
}

/// Number of pages needed for `total_items`; an empty set still has one page.
pub fn total_pages(total_items: u64, page_size: u64) -> u64 {
    if total_items == 0 {
        1
    } else {
        total_items.div_ceil(page_size)
    }
}

/// Clamps a 1-based request into `[1, total_pages]`.
pub fn clamp_page(requested: u64, total_pages: u64) -> u64 {
    requested.clamp(1, total_pages.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_and_garbage_params_default_to_one() {
        assert_eq!(parse_page_param(None), 1);
        assert_eq!(parse_page_param(Some("")), 1);
        assert_eq!(parse_page_param(Some("abc")), 1);
        assert_eq!(parse_page_param(Some("2.5")), 1);
    }

    #[test]
    fn below_minimum_params_default_to_one() {
        assert_eq!(parse_page_param(Some("0")), 1);
        assert_eq!(parse_page_param(Some("-3")), 1);
    }

    #[test]
    fn numeric_params_parse() {
        assert_eq!(parse_page_param(Some("7")), 7);
        assert_eq!(parse_page_param(Some(" 2 ")), 2);
    }

    #[test]
    fn page_counts() {
        assert_eq!(total_pages(0, 5), 1);
        assert_eq!(total_pages(1, 5), 1);
        assert_eq!(total_pages(5, 5), 1);
        assert_eq!(total_pages(6, 5), 2);
        assert_eq!(total_pages(11, 5), 3);
    }

    #[test]
    fn clamping_never_leaves_valid_range() {
        assert_eq!(clamp_page(1, 3), 1);
        assert_eq!(clamp_page(3, 3), 3);
        assert_eq!(clamp_page(99, 3), 3);
        assert_eq!(clamp_page(99, 1), 1);
    }

    #[test]
    fn empty_page_is_one_of_one() {
        let page: Page<()> = Page::empty();
        assert_eq!(page.number, 1);
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_prev);
        assert!(!page.has_next);
    }

    #[test]
    fn pager_flags_follow_position() {
        let middle: Page<u8> = Page::new(vec![1, 2, 3], 2, 4, 18);
        assert!(middle.has_prev);
        assert!(middle.has_next);
        let last: Page<u8> = Page::new(vec![4], 4, 4, 18);
        assert!(last.has_prev);
        assert!(!last.has_next);
    }
}
