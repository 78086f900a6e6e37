//! Categories, genres and titles against a real database.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_user, delete_auth, get, patch_json_auth, post_json_auth, token_for};
use serde_json::json;
use sqlx::PgPool;
use yamdb_core::roles::Role;

/// Seed two categories, two genres and an admin token.
async fn seed_catalog(pool: &PgPool) -> String {
    let admin = create_user(pool, "admin", Role::Admin).await;
    let token = token_for(&admin);

    for (path, name, slug) in [
        ("/api/v1/categories", "Books", "books"),
        ("/api/v1/categories", "Films", "films"),
        ("/api/v1/genres", "Drama", "drama"),
        ("/api/v1/genres", "Sci-Fi", "sci-fi"),
    ] {
        let app = common::build_test_app(pool.clone());
        let response =
            post_json_auth(app, path, json!({ "name": name, "slug": slug }), &token).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }
    token
}

async fn create_title(pool: &PgPool, token: &str, body: serde_json::Value) -> serde_json::Value {
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/v1/titles", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

async fn review(pool: &PgPool, title_id: i64, username: &str, score: i32) {
    let user = create_user(pool, username, Role::User).await;
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/titles/{title_id}/reviews"),
        json!({ "text": "Worth it", "score": score }),
        &token_for(&user),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

// ---------------------------------------------------------------------------
// Taxonomies
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_category_list_search_and_delete(pool: PgPool) {
    let token = seed_catalog(&pool).await;

    let app = common::build_test_app(pool.clone());
    let response = get(app, "/api/v1/categories?search=boo").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["results"][0], json!({ "name": "Books", "slug": "books" }));

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, "/api/v1/categories/books", &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = delete_auth(app, "/api/v1/categories/books", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_duplicate_slug_conflicts(pool: PgPool) {
    let token = seed_catalog(&pool).await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/genres",
        json!({ "name": "Drama again", "slug": "drama" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_plain_user_cannot_create_genre(pool: PgPool) {
    let user = create_user(&pool, "reader", Role::User).await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/genres",
        json!({ "name": "Horror", "slug": "horror" }),
        &token_for(&user),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Titles
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_title_read_representation(pool: PgPool) {
    let token = seed_catalog(&pool).await;
    let title = create_title(
        &pool,
        &token,
        json!({
            "name": "Dune",
            "year": 1965,
            "description": "Spice",
            "genre": ["sci-fi", "drama"],
            "category": "books"
        }),
    )
    .await;

    assert_eq!(title["name"], "Dune");
    assert_eq!(title["rating"], serde_json::Value::Null);
    assert_eq!(title["category"], json!({ "name": "Books", "slug": "books" }));
    assert_eq!(title["genre"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_title_with_unknown_category_is_rejected(pool: PgPool) {
    let token = seed_catalog(&pool).await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/titles",
        json!({ "name": "Dune", "year": 1965, "genre": [], "category": "games" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_title_from_the_future_is_rejected(pool: PgPool) {
    let token = seed_catalog(&pool).await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/titles",
        json!({ "name": "Later", "year": 3000, "genre": [], "category": "books" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_rating_is_rounded_average(pool: PgPool) {
    let token = seed_catalog(&pool).await;
    let title = create_title(
        &pool,
        &token,
        json!({ "name": "Solaris", "year": 1972, "genre": ["sci-fi"], "category": "films" }),
    )
    .await;
    let id = title["id"].as_i64().unwrap();

    review(&pool, id, "r1", 6).await;
    review(&pool, id, "r2", 8).await;
    review(&pool, id, "r3", 10).await;

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/titles/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["rating"], 8);
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_title_filters_combine(pool: PgPool) {
    let token = seed_catalog(&pool).await;
    for (name, year, category, genre) in [
        ("Dune", 1965, "books", "sci-fi"),
        ("Dune", 1984, "films", "sci-fi"),
        ("Solaris", 1972, "films", "drama"),
    ] {
        create_title(
            &pool,
            &token,
            json!({ "name": name, "year": year, "genre": [genre], "category": category }),
        )
        .await;
    }

    let app = common::build_test_app(pool.clone());
    let response = get(app, "/api/v1/titles?category=films&year=1984").await;
    let json = body_json(response).await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["results"][0]["year"], 1984);

    let app = common::build_test_app(pool.clone());
    let response = get(app, "/api/v1/titles?genre=sci-fi").await;
    assert_eq!(body_json(response).await["count"], 2);

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/titles?name=sol").await;
    let json = body_json(response).await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["results"][0]["name"], "Solaris");
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_patch_replaces_genres(pool: PgPool) {
    let token = seed_catalog(&pool).await;
    let title = create_title(
        &pool,
        &token,
        json!({ "name": "Dune", "year": 1965, "genre": ["sci-fi", "drama"], "category": "books" }),
    )
    .await;
    let id = title["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let response = patch_json_auth(
        app,
        &format!("/api/v1/titles/{id}"),
        json!({ "genre": ["drama"] }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["genre"], json!([{ "name": "Drama", "slug": "drama" }]));
    assert_eq!(json["name"], "Dune");
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_deleting_category_keeps_title(pool: PgPool) {
    let token = seed_catalog(&pool).await;
    let title = create_title(
        &pool,
        &token,
        json!({ "name": "Dune", "year": 1965, "genre": [], "category": "books" }),
    )
    .await;
    let id = title["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, "/api/v1/categories/books", &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/titles/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["category"], serde_json::Value::Null);
}
