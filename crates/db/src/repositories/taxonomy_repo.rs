//! Repository for the `categories` and `genres` tables.

use sqlx::PgPool;

use crate::models::taxonomy::{CreateTaxon, Taxon, Taxonomy};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, slug";

/// Provides list/create/delete for both taxonomy tables.
pub struct TaxonomyRepo;

impl TaxonomyRepo {
    /// Insert a new entry, returning the created row.
    pub async fn create(
        pool: &PgPool,
        kind: Taxonomy,
        input: &CreateTaxon,
    ) -> Result<Taxon, sqlx::Error> {
        let query = format!(
            "INSERT INTO {table} (name, slug) VALUES ($1, $2) RETURNING {COLUMNS}",
            table = kind.table()
        );
        sqlx::query_as::<_, Taxon>(&query)
            .bind(&input.name)
            .bind(&input.slug)
            .fetch_one(pool)
            .await
    }

    /// Find an entry by slug.
    pub async fn find_by_slug(
        pool: &PgPool,
        kind: Taxonomy,
        slug: &str,
    ) -> Result<Option<Taxon>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {table} WHERE slug = $1",
            table = kind.table()
        );
        sqlx::query_as::<_, Taxon>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Fetch every entry whose slug is in `slugs`. Unknown slugs are simply
    /// absent from the result.
    pub async fn find_by_slugs(
        pool: &PgPool,
        kind: Taxonomy,
        slugs: &[String],
    ) -> Result<Vec<Taxon>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {table} WHERE slug = ANY($1) ORDER BY id",
            table = kind.table()
        );
        sqlx::query_as::<_, Taxon>(&query)
            .bind(slugs)
            .fetch_all(pool)
            .await
    }

    /// List entries ordered by name, optionally filtered by an `ILIKE` pattern.
    pub async fn list(
        pool: &PgPool,
        kind: Taxonomy,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Taxon>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {table}
             WHERE ($1::TEXT IS NULL OR name ILIKE $1)
             ORDER BY name, id
             LIMIT $2 OFFSET $3",
            table = kind.table()
        );
        sqlx::query_as::<_, Taxon>(&query)
            .bind(search)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count entries matching the same filter as [`TaxonomyRepo::list`].
    pub async fn count(
        pool: &PgPool,
        kind: Taxonomy,
        search: Option<&str>,
    ) -> Result<i64, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*) FROM {table} WHERE ($1::TEXT IS NULL OR name ILIKE $1)",
            table = kind.table()
        );
        sqlx::query_scalar(&query).bind(search).fetch_one(pool).await
    }

    /// Delete an entry by slug. Returns `true` if a row was removed.
    pub async fn delete_by_slug(
        pool: &PgPool,
        kind: Taxonomy,
        slug: &str,
    ) -> Result<bool, sqlx::Error> {
        let query = format!("DELETE FROM {table} WHERE slug = $1", table = kind.table());
        let result = sqlx::query(&query).bind(slug).execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }
}
