//! Pagination for farm and product listings

use serde::{Deserialize, Serialize, Serializer};

/// Maximum items per page
const MAX_PER_PAGE: u32 = 100;

/// Default items per page
const DEFAULT_PER_PAGE: u32 = 20;

/// Requested page window (1-indexed, clamped)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Pagination {
    /// Page is clamped to at least 1, per page to 1..=100.
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, MAX_PER_PAGE),
        }
    }

    /// Everything on one page, for internal callers (seeding, reports).
    pub fn everything() -> Self {
        Self::new(1, MAX_PER_PAGE)
    }

    /// SQL OFFSET value.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.per_page)
    }

    /// SQL LIMIT value.
    pub fn limit(&self) -> u32 {
        self.per_page
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, DEFAULT_PER_PAGE)
    }
}

/// Query parameters for pagination
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl From<PaginationParams> for Pagination {
    fn from(params: PaginationParams) -> Self {
        Self::new(
            params.page.unwrap_or(1),
            params.per_page.unwrap_or(DEFAULT_PER_PAGE),
        )
    }
}

/// One page of results plus the total across all pages.
///
/// Serializes with navigation hints (`total_pages`, `has_next`, `next_page`, ...)
/// so clients can render pagers without redoing the arithmetic.
#[derive(Debug, Clone, PartialEq)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}

impl<T> Paginated<T> {
    /// Page through an already ordered list.
    pub fn from_vec(all: Vec<T>, page: Pagination) -> Self {
        let total = all.len() as i64;
        let items = all
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();

        Self {
            items,
            total,
            page: page.page,
            per_page: page.per_page,
        }
    }

    pub fn total_pages(&self) -> u32 {
        let total = self.total.max(0) as u64;
        let per_page = u64::from(self.per_page.max(1));
        (total.div_ceil(per_page) as u32).max(1)
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

#[derive(Serialize)]
struct PaginatedBody<'a, T> {
    items: &'a [T],
    total: i64,
    page: u32,
    per_page: u32,
    total_pages: u32,
    has_next: bool,
    has_prev: bool,
    next_page: Option<u32>,
    prev_page: Option<u32>,
}

impl<T: Serialize> Serialize for Paginated<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let has_next = self.has_next();
        let has_prev = self.has_prev();

        PaginatedBody {
            items: &self.items,
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            total_pages: self.total_pages(),
            has_next,
            has_prev,
            next_page: has_next.then(|| self.page + 1),
            prev_page: has_prev.then(|| self.page - 1),
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_of(total: i64, page: u32, per_page: u32) -> Paginated<()> {
        Paginated {
            items: vec![],
            total,
            page,
            per_page,
        }
    }

    #[test]
    fn offset_calculation() {
        assert_eq!(Pagination::new(1, 10).offset(), 0);
        assert_eq!(Pagination::new(3, 25).offset(), 50);
    }

    #[test]
    fn clamps_inputs() {
        assert_eq!(Pagination::new(0, 10).page, 1);
        assert_eq!(Pagination::new(1, 0).per_page, 1);
        assert_eq!(Pagination::new(1, 999).per_page, 100);
    }

    #[test]
    fn total_pages() {
        assert_eq!(page_of(0, 1, 10).total_pages(), 1);
        assert_eq!(page_of(25, 1, 10).total_pages(), 3);
        assert_eq!(page_of(100, 1, 10).total_pages(), 10);
    }

    #[test]
    fn navigation_flags() {
        let middle = page_of(30, 2, 10);
        assert!(middle.has_next());
        assert!(middle.has_prev());

        let last = page_of(30, 3, 10);
        assert!(!last.has_next());
    }

    #[test]
    fn pages_through_vec() {
        let page = Paginated::from_vec((1..=25).collect::<Vec<_>>(), Pagination::new(3, 10));
        assert_eq!(page.items, vec![21, 22, 23, 24, 25]);
        assert_eq!(page.total, 25);
        assert_eq!(page.page, 3);
    }

    #[test]
    fn serializes_navigation_hints() {
        let json = serde_json::to_value(page_of(30, 2, 10)).unwrap();
        assert_eq!(json["total_pages"], 3);
        assert_eq!(json["next_page"], 3);
        assert_eq!(json["prev_page"], 1);

        let json = serde_json::to_value(page_of(5, 1, 10)).unwrap();
        assert_eq!(json["next_page"], serde_json::Value::Null);
        assert_eq!(json["has_prev"], false);
    }
}
