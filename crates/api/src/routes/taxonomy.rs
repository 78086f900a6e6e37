//! Route definitions for `/categories` and `/genres`.

use axum::routing::{delete, get};
use axum::{Extension, Router};
use yamdb_db::models::taxonomy::Taxonomy;

use crate::handlers::taxonomy;
use crate::state::AppState;

/// Routes mounted at `/categories` or `/genres`, selected by `kind`.
///
/// ```text
/// GET    /                                  -> list
/// POST   /                                  -> create (admin)
/// DELETE /{slug}                            -> delete (admin)
/// ```
pub fn router(kind: Taxonomy) -> Router<AppState> {
    Router::new()
        .route("/", get(taxonomy::list).post(taxonomy::create))
        .route("/{slug}", delete(taxonomy::delete))
        .layer(Extension(kind))
}
