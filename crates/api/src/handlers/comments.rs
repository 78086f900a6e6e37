//! Handlers for `/titles/{title_id}/reviews/{review_id}/comments`.

use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::Json;
use yamdb_core::permissions::author_or_privileged_object;
use yamdb_core::types::DbId;
use yamdb_db::models::comment::{Comment, CreateComment, UpdateComment};
use yamdb_db::repositories::CommentRepo;

use super::reviews::find_review;
use crate::error::{AppError, AppResult};
use crate::extract::{ValidJson, ValidPath, ValidQuery};
use crate::middleware::rbac::{authorize, AuthorOrPrivileged};
use crate::query::PaginationParams;
use crate::response::Page;
use crate::state::AppState;

/// GET /api/v1/titles/{title_id}/reviews/{review_id}/comments
pub async fn list_comments(
    _gate: AuthorOrPrivileged,
    State(state): State<AppState>,
    ValidPath((title_id, review_id)): ValidPath<(DbId, DbId)>,
    ValidQuery(params): ValidQuery<PaginationParams>,
) -> AppResult<Json<Page<Comment>>> {
    let review = find_review(&state.pool, title_id, review_id).await?;
    let (limit, offset) = params.window();
    let comments = CommentRepo::list_for_review(&state.pool, review.id, limit, offset).await?;
    let count = CommentRepo::count_for_review(&state.pool, review.id).await?;
    Ok(Json(Page::new(count, comments)))
}

/// POST /api/v1/titles/{title_id}/reviews/{review_id}/comments
pub async fn create_comment(
    gate: AuthorOrPrivileged,
    State(state): State<AppState>,
    ValidPath((title_id, review_id)): ValidPath<(DbId, DbId)>,
    ValidJson(input): ValidJson<CreateComment>,
) -> AppResult<(StatusCode, Json<Comment>)> {
    let author = gate.into_user()?.user;
    let review = find_review(&state.pool, title_id, review_id).await?;

    let comment = CommentRepo::create(&state.pool, review.id, author.id, &input).await?;
    tracing::info!(comment_id = comment.id, review_id, author_id = author.id, "Comment created");
    Ok((StatusCode::CREATED, Json(comment)))
}

/// GET /api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}
pub async fn get_comment(
    _gate: AuthorOrPrivileged,
    State(state): State<AppState>,
    ValidPath((title_id, review_id, comment_id)): ValidPath<(DbId, DbId, DbId)>,
) -> AppResult<Json<Comment>> {
    Ok(Json(
        find_comment(&state, title_id, review_id, comment_id).await?,
    ))
}

/// PATCH /api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}
pub async fn update_comment(
    gate: AuthorOrPrivileged,
    method: Method,
    State(state): State<AppState>,
    ValidPath((title_id, review_id, comment_id)): ValidPath<(DbId, DbId, DbId)>,
    ValidJson(input): ValidJson<UpdateComment>,
) -> AppResult<Json<Comment>> {
    let comment = find_comment(&state, title_id, review_id, comment_id).await?;
    let actor = gate.actor();
    authorize(
        author_or_privileged_object(&method, actor.as_ref(), comment.author_id),
        actor.as_ref(),
    )?;

    let updated = CommentRepo::update(&state.pool, comment.id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Comment", comment_id))?;
    Ok(Json(updated))
}

/// DELETE /api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}
pub async fn delete_comment(
    gate: AuthorOrPrivileged,
    method: Method,
    State(state): State<AppState>,
    ValidPath((title_id, review_id, comment_id)): ValidPath<(DbId, DbId, DbId)>,
) -> AppResult<StatusCode> {
    let comment = find_comment(&state, title_id, review_id, comment_id).await?;
    let actor = gate.actor();
    authorize(
        author_or_privileged_object(&method, actor.as_ref(), comment.author_id),
        actor.as_ref(),
    )?;

    CommentRepo::delete(&state.pool, comment.id).await?;
    tracing::info!(comment_id, review_id, "Comment deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn find_comment(
    state: &AppState,
    title_id: DbId,
    review_id: DbId,
    comment_id: DbId,
) -> AppResult<Comment> {
    let review = find_review(&state.pool, title_id, review_id).await?;
    CommentRepo::find(&state.pool, review.id, comment_id)
        .await?
        .ok_or_else(|| AppError::not_found("Comment", comment_id))
}
