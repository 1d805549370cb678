use serde::{Deserialize, Serialize};

/// `{ "data": [...], "pagination": {...} }` list wrapper used by auth9-core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaginationMeta {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl PaginationMeta {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// `{ "data": ... }` wrapper for single-object responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// Convert a 1-based page number into an API offset. Saturates instead of
/// overflowing on absurd page numbers.
pub fn page_to_offset(page: i64, per_page: i64) -> i64 {
    (page.max(1) - 1).saturating_mul(per_page.max(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_to_offset() {
        assert_eq!(page_to_offset(1, 50), 0);
        assert_eq!(page_to_offset(3, 50), 100);
        assert_eq!(page_to_offset(0, 50), 0);
        assert_eq!(page_to_offset(-4, 20), 0);
    }

    #[test]
    fn test_page_to_offset_saturates() {
        assert_eq!(page_to_offset(i64::MAX, 50), i64::MAX);
        assert_eq!(page_to_offset(i64::MAX, 1), i64::MAX - 1);
        assert_eq!(page_to_offset(i64::MIN, 50), 0);
    }

    #[test]
    fn test_navigation_flags() {
        let first = PaginationMeta { page: 1, per_page: 50, total: 120, total_pages: 3 };
        assert!(!first.has_previous());
        assert!(first.has_next());

        let last = PaginationMeta { page: 3, ..first };
        assert!(last.has_previous());
        assert!(!last.has_next());

        let empty = PaginationMeta { page: 1, per_page: 50, total: 0, total_pages: 0 };
        assert!(!empty.has_previous());
        assert!(!empty.has_next());
    }
}
