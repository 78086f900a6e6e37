//! Handlers for the `/users` directory and the caller's own profile.
//!
//! Every route requires authentication. `/users/me` is open to any account;
//! the rest of the directory is admin-only (see [`RequireSelfOrAdmin`]).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use yamdb_core::accounts::{normalize_username, validate_username};
use yamdb_core::permissions::self_assignable_role;
use yamdb_db::models::user::{CreateUser, UpdateMe, UpdateUser, UserResponse};
use yamdb_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{ValidJson, ValidPath, ValidQuery};
use crate::middleware::rbac::RequireSelfOrAdmin;
use crate::query::SearchParams;
use crate::response::Page;
use crate::state::AppState;

/// GET /api/v1/users?search=&limit=&offset=
pub async fn list_users(
    RequireSelfOrAdmin(_admin): RequireSelfOrAdmin,
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<SearchParams>,
) -> AppResult<Json<Page<UserResponse>>> {
    let pattern = params.pattern();
    let (limit, offset) = params.window();
    let users = UserRepo::list(&state.pool, pattern.as_deref(), limit, offset).await?;
    let count = UserRepo::count(&state.pool, pattern.as_deref()).await?;
    Ok(Json(Page::new(
        count,
        users.into_iter().map(UserResponse::from).collect(),
    )))
}

/// POST /api/v1/users
///
/// The account gets a confirmation code so it can later obtain a token
/// through `/auth/signup` + `/auth/token`.
pub async fn create_user(
    RequireSelfOrAdmin(admin): RequireSelfOrAdmin,
    State(state): State<AppState>,
    ValidJson(mut input): ValidJson<CreateUser>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    input.username = normalize_username(&input.username);
    validate_username(&input.username)?;

    let code = state.codes.generate();
    let user = UserRepo::create(&state.pool, &input, &code).await?;
    tracing::info!(user_id = user.id, created_by = admin.user.id, "User created");
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// GET /api/v1/users/{username}
pub async fn get_user(
    RequireSelfOrAdmin(_admin): RequireSelfOrAdmin,
    State(state): State<AppState>,
    ValidPath(username): ValidPath<String>,
) -> AppResult<Json<UserResponse>> {
    let username = normalize_username(&username);
    let user = UserRepo::find_by_username(&state.pool, &username)
        .await?
        .ok_or_else(|| AppError::not_found("User", &username))?;
    Ok(Json(user.into()))
}

/// PATCH /api/v1/users/{username}
pub async fn update_user(
    RequireSelfOrAdmin(_admin): RequireSelfOrAdmin,
    State(state): State<AppState>,
    ValidPath(username): ValidPath<String>,
    ValidJson(mut input): ValidJson<UpdateUser>,
) -> AppResult<Json<UserResponse>> {
    let username = normalize_username(&username);
    let user = UserRepo::find_by_username(&state.pool, &username)
        .await?
        .ok_or_else(|| AppError::not_found("User", &username))?;

    if let Some(new_name) = input.username.take() {
        let new_name = normalize_username(&new_name);
        validate_username(&new_name)?;
        input.username = Some(new_name);
    }

    let updated = UserRepo::update(&state.pool, user.id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("User", &username))?;
    Ok(Json(updated.into()))
}

/// DELETE /api/v1/users/{username}
pub async fn delete_user(
    RequireSelfOrAdmin(admin): RequireSelfOrAdmin,
    State(state): State<AppState>,
    ValidPath(username): ValidPath<String>,
) -> AppResult<StatusCode> {
    let username = normalize_username(&username);
    let user = UserRepo::find_by_username(&state.pool, &username)
        .await?
        .ok_or_else(|| AppError::not_found("User", &username))?;

    UserRepo::delete(&state.pool, user.id).await?;
    tracing::info!(user_id = user.id, deleted_by = admin.user.id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/users/me
pub async fn get_me(RequireSelfOrAdmin(auth): RequireSelfOrAdmin) -> Json<UserResponse> {
    Json(auth.user.into())
}

/// PATCH /api/v1/users/me
///
/// `username` and `email` are read-only here. A requested `role` is applied
/// only for admins; anyone else keeps their current role.
pub async fn update_me(
    RequireSelfOrAdmin(auth): RequireSelfOrAdmin,
    State(state): State<AppState>,
    ValidJson(input): ValidJson<UpdateMe>,
) -> AppResult<Json<UserResponse>> {
    let role = self_assignable_role(&auth.actor(), auth.user.role, input.role);
    let patch = UpdateUser {
        first_name: input.first_name,
        last_name: input.last_name,
        bio: input.bio,
        role: Some(role),
        ..Default::default()
    };

    let updated = UserRepo::update(&state.pool, auth.user.id, &patch)
        .await?
        .ok_or_else(|| AppError::not_found("User", &auth.user.username))?;
    Ok(Json(updated.into()))
}
