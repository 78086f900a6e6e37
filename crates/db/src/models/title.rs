//! Title entity model, read representation and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use yamdb_core::types::DbId;

use crate::models::taxonomy::Taxon;

/// A title row joined with its category and aggregate rating.
#[derive(Debug, Clone, FromRow)]
pub struct TitleRow {
    pub id: DbId,
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category_id: Option<DbId>,
    pub category_name: Option<String>,
    pub category_slug: Option<String>,
    /// `ROUND(AVG(score))`; `None` when the title has no reviews.
    pub rating: Option<i32>,
}

/// One genre link, used to batch-load genres for a page of titles.
#[derive(Debug, Clone, FromRow)]
pub struct TitleGenre {
    pub title_id: DbId,
    pub id: DbId,
    pub name: String,
    pub slug: String,
}

/// Read representation returned by every title endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct TitleDetail {
    pub id: DbId,
    pub name: String,
    pub year: i32,
    pub rating: Option<i32>,
    pub description: Option<String>,
    pub genre: Vec<Taxon>,
    pub category: Option<Taxon>,
}

impl TitleDetail {
    pub fn from_row(row: TitleRow, genre: Vec<Taxon>) -> Self {
        let category = match (row.category_id, row.category_name, row.category_slug) {
            (Some(id), Some(name), Some(slug)) => Some(Taxon { id, name, slug }),
            _ => None,
        };
        Self {
            id: row.id,
            name: row.name,
            year: row.year,
            rating: row.rating,
            description: row.description,
            genre,
            category,
        }
    }
}

/// Filters accepted by `GET /titles`. All are optional and combine with AND.
#[derive(Debug, Clone, Default)]
pub struct TitleFilter {
    /// Already wrapped as an `ILIKE` pattern.
    pub name_pattern: Option<String>,
    pub category: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i32>,
}

/// DTO for creating a title. Category and genres are referenced by slug.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTitle {
    #[validate(length(min = 1, max = 256))]
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    #[serde(default)]
    pub genre: Vec<String>,
    pub category: String,
}

/// DTO for updating a title. All fields are optional; `genre`, when present,
/// replaces the whole set.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTitle {
    #[validate(length(min = 1, max = 256))]
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub genre: Option<Vec<String>>,
    pub category: Option<String>,
}

/// Insert model with category and genre slugs resolved to ids.
#[derive(Debug, Clone)]
pub struct NewTitle {
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category_id: DbId,
    pub genre_ids: Vec<DbId>,
}

/// Patch model with slugs resolved to ids. `None` leaves a column untouched.
#[derive(Debug, Clone, Default)]
pub struct TitlePatch {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub category_id: Option<DbId>,
    pub genre_ids: Option<Vec<DbId>>,
}
