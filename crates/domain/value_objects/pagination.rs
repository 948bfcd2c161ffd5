pub const MAX_PAGE_LIMIT: i64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    /// Clamps raw query values: page starts at 1, a non-positive limit takes
    /// `default_limit`, and no page is larger than [`MAX_PAGE_LIMIT`].
    pub fn new(page: Option<i64>, limit: Option<i64>, default_limit: i64) -> Self {
        let page = page.filter(|p| *p >= 1).unwrap_or(1);
        let limit = match limit {
            Some(l) if l > 0 => l.min(MAX_PAGE_LIMIT),
            _ => default_limit,
        };

        Self { page, limit }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_page_and_limit() {
        let p = Pagination::new(Some(0), Some(-3), 50);
        assert_eq!(p, Pagination { page: 1, limit: 50 });
        assert_eq!(p.offset(), 0);

        let p = Pagination::new(Some(3), Some(10_000), 10);
        assert_eq!(p.limit, MAX_PAGE_LIMIT);
        assert_eq!(p.offset(), 1000);
    }

    #[test]
    fn uses_entity_default_when_missing() {
        assert_eq!(Pagination::new(None, None, 10), Pagination { page: 1, limit: 10 });
    }
}
