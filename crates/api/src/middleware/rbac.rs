//! Role-based access control.
//!
//! The policies themselves live in `yamdb_core::permissions`; this module maps
//! their verdicts onto HTTP status codes and provides the directory gate as an
//! extractor.

use axum::extract::{FromRequestParts, MatchedPath};
use axum::http::request::Parts;
use axum::http::Method;
use yamdb_core::permissions::{
    admin_or_read_list, admin_or_read_only, author_or_privileged, self_or_admin, Actor,
};

use super::auth::{AuthUser, MaybeUser};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Route template of the caller's own profile.
const ME_ROUTE_SUFFIX: &str = "/users/me";

/// Turn a policy verdict into a result: 401 for anonymous callers, 403 for
/// authenticated ones.
pub fn authorize(allowed: bool, caller: Option<&Actor>) -> AppResult<()> {
    if allowed {
        return Ok(());
    }
    match caller {
        None => Err(AppError::unauthorized(
            "Authentication credentials were not provided",
        )),
        Some(_) => Err(AppError::forbidden(
            "You do not have permission to perform this action",
        )),
    }
}

/// Resolve the optional caller and apply a collection-level policy to the
/// request method.
async fn gate(
    parts: &mut Parts,
    state: &AppState,
    policy: fn(&Method, Option<&Actor>) -> bool,
) -> Result<Option<AuthUser>, AppError> {
    let MaybeUser(user) = MaybeUser::from_request_parts(parts, state).await?;
    let actor = user.as_ref().map(AuthUser::actor);
    authorize(policy(&parts.method, actor.as_ref()), actor.as_ref())?;
    Ok(user)
}

/// Reads are public; writes require an admin. Used by categories and genres.
///
/// Item routes additionally check [`yamdb_core::permissions::admin_or_read_list_object`].
pub struct AdminOrReadList(pub Option<AuthUser>);

impl FromRequestParts<AppState> for AdminOrReadList {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        gate(parts, state, admin_or_read_list).await.map(AdminOrReadList)
    }
}

/// Reads are public; writes require an admin. Used by titles.
pub struct AdminOrReadOnly(pub Option<AuthUser>);

impl FromRequestParts<AppState> for AdminOrReadOnly {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        gate(parts, state, admin_or_read_only).await.map(AdminOrReadOnly)
    }
}

/// Reads are public; any authenticated user may write. Used by reviews and
/// comments, whose item routes also check authorship.
pub struct AuthorOrPrivileged(pub Option<AuthUser>);

impl AuthorOrPrivileged {
    pub fn actor(&self) -> Option<Actor> {
        self.0.as_ref().map(AuthUser::actor)
    }

    /// The caller on a write route, where the gate already required one.
    pub fn into_user(self) -> AppResult<AuthUser> {
        self.0.ok_or_else(|| {
            AppError::unauthorized("Authentication credentials were not provided")
        })
    }
}

impl FromRequestParts<AppState> for AuthorOrPrivileged {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        gate(parts, state, author_or_privileged).await.map(AuthorOrPrivileged)
    }
}

/// Requires an authenticated caller who is either on the `/users/me` route or
/// an admin/superuser.
///
/// ```ignore
/// async fn list_users(RequireSelfOrAdmin(auth): RequireSelfOrAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireSelfOrAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireSelfOrAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let is_me_route = parts
            .extensions
            .get::<MatchedPath>()
            .is_some_and(|path| path.as_str().ends_with(ME_ROUTE_SUFFIX));

        let MaybeUser(user) = MaybeUser::from_request_parts(parts, state).await?;
        let actor = user.as_ref().map(AuthUser::actor);
        authorize(self_or_admin(actor.as_ref(), is_me_route), actor.as_ref())?;

        user.map(RequireSelfOrAdmin).ok_or_else(|| {
            AppError::unauthorized("Authentication credentials were not provided")
        })
    }
}
