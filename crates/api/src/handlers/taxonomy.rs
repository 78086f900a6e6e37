//! Handlers shared by `/categories` and `/genres`.
//!
//! The router installs an `Extension<Taxonomy>` on each mount so the same
//! handlers serve both tables.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use yamdb_core::catalog::validate_slug;
use yamdb_core::permissions::admin_or_read_list_object;
use yamdb_db::models::taxonomy::{CreateTaxon, Taxon, Taxonomy};
use yamdb_db::repositories::TaxonomyRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{ValidJson, ValidPath, ValidQuery};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{authorize, AdminOrReadList};
use crate::query::SearchParams;
use crate::response::Page;
use crate::state::AppState;

/// GET /api/v1/{categories|genres}?search=&limit=&offset=
pub async fn list(
    Extension(kind): Extension<Taxonomy>,
    _gate: AdminOrReadList,
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<SearchParams>,
) -> AppResult<Json<Page<Taxon>>> {
    let pattern = params.pattern();
    let (limit, offset) = params.window();
    let items = TaxonomyRepo::list(&state.pool, kind, pattern.as_deref(), limit, offset).await?;
    let count = TaxonomyRepo::count(&state.pool, kind, pattern.as_deref()).await?;
    Ok(Json(Page::new(count, items)))
}

/// POST /api/v1/{categories|genres}
pub async fn create(
    Extension(kind): Extension<Taxonomy>,
    _gate: AdminOrReadList,
    State(state): State<AppState>,
    ValidJson(input): ValidJson<CreateTaxon>,
) -> AppResult<(StatusCode, Json<Taxon>)> {
    validate_slug(&input.slug)?;
    let taxon = TaxonomyRepo::create(&state.pool, kind, &input).await?;
    tracing::info!(kind = kind.table(), slug = %taxon.slug, "Taxonomy entry created");
    Ok((StatusCode::CREATED, Json(taxon)))
}

/// DELETE /api/v1/{categories|genres}/{slug}
pub async fn delete(
    Extension(kind): Extension<Taxonomy>,
    AdminOrReadList(caller): AdminOrReadList,
    State(state): State<AppState>,
    ValidPath(slug): ValidPath<String>,
) -> AppResult<StatusCode> {
    TaxonomyRepo::find_by_slug(&state.pool, kind, &slug)
        .await?
        .ok_or_else(|| AppError::not_found(kind.entity(), &slug))?;

    let actor = caller.as_ref().map(AuthUser::actor);
    authorize(admin_or_read_list_object(actor.as_ref()), actor.as_ref())?;

    if !TaxonomyRepo::delete_by_slug(&state.pool, kind, &slug).await? {
        return Err(AppError::not_found(kind.entity(), &slug));
    }
    tracing::info!(kind = kind.table(), slug = %slug, "Taxonomy entry deleted");
    Ok(StatusCode::NO_CONTENT)
}
