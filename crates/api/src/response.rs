//! Shared response envelope types for API handlers.

use serde::Serialize;

/// Paginated list envelope: `{ "count": N, "results": [...] }`.
///
/// `count` is the total number of matching rows, not the page size.
#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    pub count: i64,
    pub results: Vec<T>,
}

impl<T: Serialize> Page<T> {
    pub fn new(count: i64, results: Vec<T>) -> Self {
        Self { count, results }
    }
}
