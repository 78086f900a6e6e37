//! Repository for the `titles` and `title_genres` tables.
//!
//! Every read joins the category and aggregates review scores so the rating
//! is always computed from the current set of reviews.

use std::collections::HashMap;

use sqlx::PgPool;
use yamdb_core::types::DbId;

use crate::models::taxonomy::Taxon;
use crate::models::title::{NewTitle, TitleDetail, TitleFilter, TitleGenre, TitlePatch, TitleRow};

/// Select list and joins for [`TitleRow`]. Callers append `WHERE` and must
/// finish with [`GROUP_BY`].
const SELECT_ROWS: &str = "SELECT t.id, t.name, t.year, t.description, t.category_id,
            c.name AS category_name, c.slug AS category_slug,
            ROUND(AVG(r.score))::INT4 AS rating
     FROM titles t
     LEFT JOIN categories c ON c.id = t.category_id
     LEFT JOIN reviews r ON r.title_id = t.id";

const GROUP_BY: &str = "GROUP BY t.id, c.id";

/// Filter clause over `$1..$4` shared by list and count.
const FILTER: &str = "($1::TEXT IS NULL OR t.name ILIKE $1)
       AND ($2::TEXT IS NULL OR c.slug = $2)
       AND ($3::TEXT IS NULL OR EXISTS (
               SELECT 1 FROM title_genres tg
               JOIN genres g ON g.id = tg.genre_id
               WHERE tg.title_id = t.id AND g.slug = $3))
       AND ($4::INT4 IS NULL OR t.year = $4)";

/// Provides CRUD operations for titles.
pub struct TitleRepo;

impl TitleRepo {
    /// Insert a title and its genre links in one transaction, returning the new id.
    pub async fn create(pool: &PgPool, input: &NewTitle) -> Result<DbId, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let id: DbId = sqlx::query_scalar(
            "INSERT INTO titles (name, year, description, category_id)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(&input.name)
        .bind(input.year)
        .bind(&input.description)
        .bind(input.category_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO title_genres (title_id, genre_id)
             SELECT $1, UNNEST($2::BIGINT[])
             ON CONFLICT DO NOTHING",
        )
        .bind(id)
        .bind(&input.genre_ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(id)
    }

    /// Find a title with its rating and category.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<TitleRow>, sqlx::Error> {
        let query = format!("{SELECT_ROWS} WHERE t.id = $1 {GROUP_BY}");
        sqlx::query_as::<_, TitleRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a title and attach its genres.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<TitleDetail>, sqlx::Error> {
        match Self::find_by_id(pool, id).await? {
            Some(row) => Ok(Self::attach_genres(pool, vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Whether a title with this id exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM titles WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// List titles ordered by id, applying every filter that is set.
    pub async fn list(
        pool: &PgPool,
        filter: &TitleFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TitleDetail>, sqlx::Error> {
        let query = format!(
            "{SELECT_ROWS} WHERE {FILTER} {GROUP_BY}
             ORDER BY t.id
             LIMIT $5 OFFSET $6"
        );
        let rows = sqlx::query_as::<_, TitleRow>(&query)
            .bind(&filter.name_pattern)
            .bind(&filter.category)
            .bind(&filter.genre)
            .bind(filter.year)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;
        Self::attach_genres(pool, rows).await
    }

    /// Count titles matching the same filter as [`TitleRepo::list`].
    pub async fn count(pool: &PgPool, filter: &TitleFilter) -> Result<i64, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*) FROM titles t
             LEFT JOIN categories c ON c.id = t.category_id
             WHERE {FILTER}"
        );
        sqlx::query_scalar(&query)
            .bind(&filter.name_pattern)
            .bind(&filter.category)
            .bind(&filter.genre)
            .bind(filter.year)
            .fetch_one(pool)
            .await
    }

    /// Apply a partial update. A present `genre_ids` replaces the whole set.
    ///
    /// Returns `false` if no row with the given `id` exists.
    pub async fn update(pool: &PgPool, id: DbId, input: &TitlePatch) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query(
            "UPDATE titles SET
                name = COALESCE($2, name),
                year = COALESCE($3, year),
                description = COALESCE($4, description),
                category_id = COALESCE($5, category_id)
             WHERE id = $1",
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.year)
        .bind(&input.description)
        .bind(input.category_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        if let Some(genre_ids) = &input.genre_ids {
            sqlx::query("DELETE FROM title_genres WHERE title_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            sqlx::query(
                "INSERT INTO title_genres (title_id, genre_id)
                 SELECT $1, UNNEST($2::BIGINT[])
                 ON CONFLICT DO NOTHING",
            )
            .bind(id)
            .bind(genre_ids)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(true)
    }

    /// Delete a title with its reviews and their comments.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM titles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Load genres for a page of titles with a single query.
    async fn attach_genres(
        pool: &PgPool,
        rows: Vec<TitleRow>,
    ) -> Result<Vec<TitleDetail>, sqlx::Error> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<DbId> = rows.iter().map(|r| r.id).collect();
        let links = sqlx::query_as::<_, TitleGenre>(
            "SELECT tg.title_id, g.id, g.name, g.slug
             FROM title_genres tg
             JOIN genres g ON g.id = tg.genre_id
             WHERE tg.title_id = ANY($1)
             ORDER BY g.name, g.id",
        )
        .bind(&ids)
        .fetch_all(pool)
        .await?;

        let mut by_title: HashMap<DbId, Vec<Taxon>> = HashMap::new();
        for link in links {
            by_title.entry(link.title_id).or_default().push(Taxon {
                id: link.id,
                name: link.name,
                slug: link.slug,
            });
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let genre = by_title.remove(&row.id).unwrap_or_default();
                TitleDetail::from_row(row, genre)
            })
            .collect())
    }
}
