//! Shared query parameter types for API handlers.

use serde::Deserialize;
use yamdb_core::catalog::contains_pattern;
use yamdb_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};

/// Generic pagination parameters (`?limit=&offset=`).
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Clamped `(limit, offset)` ready to bind.
    pub fn window(&self) -> (i64, i64) {
        page_window(self.limit, self.offset)
    }
}

/// `?search=&limit=&offset=` for the user directory, categories and genres.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl SearchParams {
    /// Case-insensitive substring pattern, or `None` for a blank search.
    pub fn pattern(&self) -> Option<String> {
        blank_to_none(self.search.as_deref()).map(contains_pattern)
    }

    pub fn window(&self) -> (i64, i64) {
        page_window(self.limit, self.offset)
    }
}

/// Filters and pagination for `GET /titles`.
#[derive(Debug, Default, Deserialize)]
pub struct TitleQuery {
    pub name: Option<String>,
    pub category: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl TitleQuery {
    pub fn window(&self) -> (i64, i64) {
        page_window(self.limit, self.offset)
    }
}

fn page_window(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
    (
        clamp_limit(limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT),
        clamp_offset(offset),
    )
}

/// Treat empty or whitespace-only query values as absent.
pub fn blank_to_none(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
