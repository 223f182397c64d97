//! Pagination types shared by the list endpoints.

use serde::{Deserialize, Serialize};

/// Query parameters for paginated list endpoints.
///
/// Field names follow the public API contract: `skip` is the row offset,
/// `limit` the page size (capped at 200).
#[derive(Debug, Deserialize, Default)]
pub struct PaginationQuery {
    #[serde(default)]
    pub skip: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
}

impl PaginationQuery {
    /// Page size, clamped to 1..=200 (default 50)
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(50).clamp(1, 200)
    }

    /// Row offset, minimum 0
    pub fn skip(&self) -> i64 {
        self.skip.unwrap_or(0).max(0)
    }
}

/// Paginated response wrapper for admin list endpoints.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    /// Total matching rows across all pages
    pub total: i64,
    pub limit: i64,
    pub skip: i64,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, total: i64, limit: i64, skip: i64) -> Self {
        Self {
            items,
            total,
            limit,
            skip,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_is_clamped_to_max_page_size() {
        let q = PaginationQuery {
            skip: None,
            limit: Some(5000),
        };
        assert_eq!(q.limit(), 200);

        let q = PaginationQuery {
            skip: None,
            limit: Some(0),
        };
        assert_eq!(q.limit(), 1);
    }

    #[test]
    fn negative_skip_is_floored() {
        let q = PaginationQuery {
            skip: Some(-10),
            limit: None,
        };
        assert_eq!(q.skip(), 0);
        assert_eq!(q.limit(), 50);
    }
}
