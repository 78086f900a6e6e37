//! Handlers for the `/titles` resource.
//!
//! Writes are admin-only. Every response uses the read representation with
//! nested category, genre list and computed rating.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Datelike;
use yamdb_core::catalog::{contains_pattern, validate_year};
use yamdb_core::types::DbId;
use yamdb_db::models::taxonomy::Taxonomy;
use yamdb_db::models::title::{
    CreateTitle, NewTitle, TitleDetail, TitleFilter, TitlePatch, UpdateTitle,
};
use yamdb_db::repositories::{TaxonomyRepo, TitleRepo};
use yamdb_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::extract::{ValidJson, ValidPath, ValidQuery};
use crate::middleware::rbac::AdminOrReadOnly;
use crate::query::{blank_to_none, TitleQuery};
use crate::response::Page;
use crate::state::AppState;

/// GET /api/v1/titles?name=&category=&genre=&year=&limit=&offset=
pub async fn list_titles(
    _gate: AdminOrReadOnly,
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<TitleQuery>,
) -> AppResult<Json<Page<TitleDetail>>> {
    let filter = TitleFilter {
        name_pattern: blank_to_none(params.name.as_deref()).map(contains_pattern),
        category: blank_to_none(params.category.as_deref()).map(str::to_string),
        genre: blank_to_none(params.genre.as_deref()).map(str::to_string),
        year: params.year,
    };
    let (limit, offset) = params.window();

    let titles = TitleRepo::list(&state.pool, &filter, limit, offset).await?;
    let count = TitleRepo::count(&state.pool, &filter).await?;
    Ok(Json(Page::new(count, titles)))
}

/// POST /api/v1/titles
///
/// Category and genres are given by slug; unknown slugs are a 400.
pub async fn create_title(
    _gate: AdminOrReadOnly,
    State(state): State<AppState>,
    ValidJson(input): ValidJson<CreateTitle>,
) -> AppResult<(StatusCode, Json<TitleDetail>)> {
    validate_year(input.year, current_year())?;
    let category_id = resolve_category(&state.pool, &input.category).await?;
    let genre_ids = resolve_genres(&state.pool, &input.genre).await?;

    let new_title = NewTitle {
        name: input.name,
        year: input.year,
        description: input.description,
        category_id,
        genre_ids,
    };
    let id = TitleRepo::create(&state.pool, &new_title).await?;
    tracing::info!(title_id = id, "Title created");

    let detail = load_title(&state.pool, id).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// GET /api/v1/titles/{title_id}
pub async fn get_title(
    _gate: AdminOrReadOnly,
    State(state): State<AppState>,
    ValidPath(title_id): ValidPath<DbId>,
) -> AppResult<Json<TitleDetail>> {
    Ok(Json(load_title(&state.pool, title_id).await?))
}

/// PATCH /api/v1/titles/{title_id}
///
/// A present `genre` list replaces the title's genres.
pub async fn update_title(
    _gate: AdminOrReadOnly,
    State(state): State<AppState>,
    ValidPath(title_id): ValidPath<DbId>,
    ValidJson(input): ValidJson<UpdateTitle>,
) -> AppResult<Json<TitleDetail>> {
    if !TitleRepo::exists(&state.pool, title_id).await? {
        return Err(AppError::not_found("Title", title_id));
    }

    if let Some(year) = input.year {
        validate_year(year, current_year())?;
    }
    let category_id = match input.category.as_deref() {
        Some(slug) => Some(resolve_category(&state.pool, slug).await?),
        None => None,
    };
    let genre_ids = match input.genre.as_deref() {
        Some(slugs) => Some(resolve_genres(&state.pool, slugs).await?),
        None => None,
    };

    let patch = TitlePatch {
        name: input.name,
        year: input.year,
        description: input.description,
        category_id,
        genre_ids,
    };
    if !TitleRepo::update(&state.pool, title_id, &patch).await? {
        return Err(AppError::not_found("Title", title_id));
    }

    Ok(Json(load_title(&state.pool, title_id).await?))
}

/// DELETE /api/v1/titles/{title_id}
pub async fn delete_title(
    _gate: AdminOrReadOnly,
    State(state): State<AppState>,
    ValidPath(title_id): ValidPath<DbId>,
) -> AppResult<StatusCode> {
    if !TitleRepo::delete(&state.pool, title_id).await? {
        return Err(AppError::not_found("Title", title_id));
    }
    tracing::info!(title_id, "Title deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn current_year() -> i32 {
    chrono::Utc::now().year()
}

async fn load_title(pool: &DbPool, title_id: DbId) -> AppResult<TitleDetail> {
    TitleRepo::find_detail(pool, title_id)
        .await?
        .ok_or_else(|| AppError::not_found("Title", title_id))
}

async fn resolve_category(pool: &DbPool, slug: &str) -> AppResult<DbId> {
    TaxonomyRepo::find_by_slug(pool, Taxonomy::Category, slug)
        .await?
        .map(|category| category.id)
        .ok_or_else(|| AppError::validation(format!("Unknown category '{slug}'")))
}

/// Map genre slugs to ids, rejecting the request if any slug is unknown.
async fn resolve_genres(pool: &DbPool, slugs: &[String]) -> AppResult<Vec<DbId>> {
    let mut wanted: Vec<String> = slugs.to_vec();
    wanted.sort();
    wanted.dedup();

    let found = TaxonomyRepo::find_by_slugs(pool, Taxonomy::Genre, &wanted).await?;
    if found.len() != wanted.len() {
        let missing: Vec<&str> = wanted
            .iter()
            .filter(|slug| !found.iter().any(|genre| &genre.slug == *slug))
            .map(String::as_str)
            .collect();
        return Err(AppError::validation(format!(
            "Unknown genre(s): {}",
            missing.join(", ")
        )));
    }
    Ok(found.into_iter().map(|genre| genre.id).collect())
}
