//! Handlers for `/titles/{title_id}/reviews`.

use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::Json;
use yamdb_core::permissions::author_or_privileged_object;
use yamdb_core::types::DbId;
use yamdb_db::models::review::{CreateReview, Review, UpdateReview};
use yamdb_db::repositories::{ReviewRepo, TitleRepo};
use yamdb_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::extract::{ValidJson, ValidPath, ValidQuery};
use crate::middleware::rbac::{authorize, AuthorOrPrivileged};
use crate::query::PaginationParams;
use crate::response::Page;
use crate::state::AppState;

/// GET /api/v1/titles/{title_id}/reviews
pub async fn list_reviews(
    _gate: AuthorOrPrivileged,
    State(state): State<AppState>,
    ValidPath(title_id): ValidPath<DbId>,
    ValidQuery(params): ValidQuery<PaginationParams>,
) -> AppResult<Json<Page<Review>>> {
    require_title(&state.pool, title_id).await?;
    let (limit, offset) = params.window();
    let reviews = ReviewRepo::list_for_title(&state.pool, title_id, limit, offset).await?;
    let count = ReviewRepo::count_for_title(&state.pool, title_id).await?;
    Ok(Json(Page::new(count, reviews)))
}

/// POST /api/v1/titles/{title_id}/reviews
///
/// The caller becomes the author. One review per author and title.
pub async fn create_review(
    gate: AuthorOrPrivileged,
    State(state): State<AppState>,
    ValidPath(title_id): ValidPath<DbId>,
    ValidJson(input): ValidJson<CreateReview>,
) -> AppResult<(StatusCode, Json<Review>)> {
    let author = gate.into_user()?.user;
    require_title(&state.pool, title_id).await?;

    if ReviewRepo::exists_for_author(&state.pool, title_id, author.id).await? {
        return Err(AppError::validation(
            "You have already reviewed this title",
        ));
    }

    let review = ReviewRepo::create(&state.pool, title_id, author.id, &input).await?;
    tracing::info!(review_id = review.id, title_id, author_id = author.id, "Review created");
    Ok((StatusCode::CREATED, Json(review)))
}

/// GET /api/v1/titles/{title_id}/reviews/{review_id}
pub async fn get_review(
    _gate: AuthorOrPrivileged,
    State(state): State<AppState>,
    ValidPath((title_id, review_id)): ValidPath<(DbId, DbId)>,
) -> AppResult<Json<Review>> {
    Ok(Json(find_review(&state.pool, title_id, review_id).await?))
}

/// PATCH /api/v1/titles/{title_id}/reviews/{review_id}
pub async fn update_review(
    gate: AuthorOrPrivileged,
    method: Method,
    State(state): State<AppState>,
    ValidPath((title_id, review_id)): ValidPath<(DbId, DbId)>,
    ValidJson(input): ValidJson<UpdateReview>,
) -> AppResult<Json<Review>> {
    let review = find_review(&state.pool, title_id, review_id).await?;
    let actor = gate.actor();
    authorize(
        author_or_privileged_object(&method, actor.as_ref(), review.author_id),
        actor.as_ref(),
    )?;

    let updated = ReviewRepo::update(&state.pool, review.id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Review", review_id))?;
    Ok(Json(updated))
}

/// DELETE /api/v1/titles/{title_id}/reviews/{review_id}
pub async fn delete_review(
    gate: AuthorOrPrivileged,
    method: Method,
    State(state): State<AppState>,
    ValidPath((title_id, review_id)): ValidPath<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let review = find_review(&state.pool, title_id, review_id).await?;
    let actor = gate.actor();
    authorize(
        author_or_privileged_object(&method, actor.as_ref(), review.author_id),
        actor.as_ref(),
    )?;

    ReviewRepo::delete(&state.pool, review.id).await?;
    tracing::info!(review_id, title_id, "Review deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn require_title(pool: &DbPool, title_id: DbId) -> AppResult<()> {
    if TitleRepo::exists(pool, title_id).await? {
        Ok(())
    } else {
        Err(AppError::not_found("Title", title_id))
    }
}

/// Load a review that belongs to `title_id`, or 404.
pub(crate) async fn find_review(
    pool: &DbPool,
    title_id: DbId,
    review_id: DbId,
) -> AppResult<Review> {
    require_title(pool, title_id).await?;
    ReviewRepo::find(pool, title_id, review_id)
        .await?
        .ok_or_else(|| AppError::not_found("Review", review_id))
}
