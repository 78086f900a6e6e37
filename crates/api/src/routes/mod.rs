pub mod auth;
pub mod health;
pub mod taxonomy;
pub mod titles;
pub mod users;

use axum::Router;
use yamdb_db::models::taxonomy::Taxonomy;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/signup                                     register / re-send code (public)
/// /auth/token                                      exchange code for token (public)
///
/// /users                                           list, create (admin)
/// /users/me                                        get, patch own profile
/// /users/{username}                                get, patch, delete (admin)
///
/// /categories                                      list, create (admin)
/// /categories/{slug}                               delete (admin)
/// /genres                                          list, create (admin)
/// /genres/{slug}                                   delete (admin)
///
/// /titles                                          list (filterable), create (admin)
/// /titles/{title_id}                               get, patch, delete (admin)
/// /titles/{title_id}/reviews                       list, create
/// /titles/{title_id}/reviews/{review_id}           get, patch, delete
/// /titles/{title_id}/reviews/{review_id}/comments  list, create
/// /titles/{title_id}/reviews/{review_id}/comments/{comment_id}
///                                                  get, patch, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Signup and token exchange.
        .nest("/auth", auth::router())
        // User directory and own profile.
        .nest("/users", users::router())
        // Taxonomies share handlers, selected by extension.
        .nest("/categories", taxonomy::router(Taxonomy::Category))
        .nest("/genres", taxonomy::router(Taxonomy::Genre))
        // Titles with nested reviews and comments.
        .nest("/titles", titles::router())
}
