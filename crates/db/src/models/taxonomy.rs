//! Categories and genres.
//!
//! Both tables share one shape (`name`, unique `slug`), so they share one
//! row type and one repository parameterized by [`Taxonomy`].

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use yamdb_core::types::DbId;

/// Which taxonomy table a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Taxonomy {
    Category,
    Genre,
}

impl Taxonomy {
    pub fn table(self) -> &'static str {
        match self {
            Taxonomy::Category => "categories",
            Taxonomy::Genre => "genres",
        }
    }

    /// Entity name used in error messages.
    pub fn entity(self) -> &'static str {
        match self {
            Taxonomy::Category => "Category",
            Taxonomy::Genre => "Genre",
        }
    }
}

/// A row from `categories` or `genres`.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Taxon {
    #[serde(skip_serializing)]
    pub id: DbId,
    pub name: String,
    pub slug: String,
}

/// DTO for creating a category or genre.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTaxon {
    #[validate(length(min = 1, max = 256))]
    pub name: String,
    pub slug: String,
}
