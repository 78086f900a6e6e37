//! Reviews and comments against a real database.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_user, delete_auth, get, patch_json_auth, post_json_auth, token_for,
};
use serde_json::json;
use sqlx::PgPool;
use yamdb_core::roles::Role;

/// Create a category and a title directly, returning the title id.
async fn seed_title(pool: &PgPool) -> i64 {
    let category_id: i64 = sqlx::query_scalar(
        "INSERT INTO categories (name, slug) VALUES ('Films', 'films') RETURNING id",
    )
    .fetch_one(pool)
    .await
    .unwrap();
    sqlx::query_scalar(
        "INSERT INTO titles (name, year, category_id) VALUES ('Stalker', 1979, $1) RETURNING id",
    )
    .bind(category_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

async fn post_review(
    pool: &PgPool,
    title_id: i64,
    token: &str,
    score: i32,
) -> axum::response::Response {
    let app = common::build_test_app(pool.clone());
    post_json_auth(
        app,
        &format!("/api/v1/titles/{title_id}/reviews"),
        json!({ "text": "A slow walk", "score": score }),
        token,
    )
    .await
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_second_review_by_same_author_is_rejected(pool: PgPool) {
    let title_id = seed_title(&pool).await;
    let author = create_user(&pool, "author", Role::User).await;
    let token = token_for(&author);

    let response = post_review(&pool, title_id, &token, 7).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let first = body_json(response).await;
    assert_eq!(first["author"], "author");

    let response = post_review(&pool, title_id, &token, 2).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/titles/{title_id}/reviews")).await;
    let json = body_json(response).await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["results"][0]["score"], 7);
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_score_out_of_range_is_rejected(pool: PgPool) {
    let title_id = seed_title(&pool).await;
    let author = create_user(&pool, "author", Role::User).await;

    let response = post_review(&pool, title_id, &token_for(&author), 11).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_review_for_missing_title_is_404(pool: PgPool) {
    let author = create_user(&pool, "author", Role::User).await;

    let response = post_review(&pool, 999_999, &token_for(&author), 5).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_non_author_can_read_but_not_modify(pool: PgPool) {
    let title_id = seed_title(&pool).await;
    let author = create_user(&pool, "author", Role::User).await;
    let stranger = create_user(&pool, "stranger", Role::User).await;

    let response = post_review(&pool, title_id, &token_for(&author), 7).await;
    let review_id = body_json(response).await["id"].as_i64().unwrap();
    let uri = format!("/api/v1/titles/{title_id}/reviews/{review_id}");

    let app = common::build_test_app(pool.clone());
    let response = get(app, &uri).await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool.clone());
    let response =
        patch_json_auth(app, &uri, json!({ "text": "hijacked" }), &token_for(&stranger)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &uri, &token_for(&stranger)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool.clone());
    let response = patch_json_auth(app, &uri, json!({ "score": 9 }), &token_for(&author)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["score"], 9);
    assert_eq!(json["text"], "A slow walk");
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_moderator_can_delete_any_review(pool: PgPool) {
    let title_id = seed_title(&pool).await;
    let author = create_user(&pool, "author", Role::User).await;
    let moderator = create_user(&pool, "moder", Role::Moderator).await;

    let response = post_review(&pool, title_id, &token_for(&author), 4).await;
    let review_id = body_json(response).await["id"].as_i64().unwrap();
    let uri = format!("/api/v1/titles/{title_id}/reviews/{review_id}");

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &uri, &token_for(&moderator)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = get(app, &uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_comment_lifecycle(pool: PgPool) {
    let title_id = seed_title(&pool).await;
    let author = create_user(&pool, "author", Role::User).await;
    let commenter = create_user(&pool, "commenter", Role::User).await;

    let response = post_review(&pool, title_id, &token_for(&author), 8).await;
    let review_id = body_json(response).await["id"].as_i64().unwrap();
    let base = format!("/api/v1/titles/{title_id}/reviews/{review_id}/comments");

    let app = common::build_test_app(pool.clone());
    let response =
        post_json_auth(app, &base, json!({ "text": "Agreed" }), &token_for(&commenter)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let comment = body_json(response).await;
    assert_eq!(comment["author"], "commenter");
    let comment_id = comment["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = get(app, &base).await;
    assert_eq!(body_json(response).await["count"], 1);

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("{base}/{comment_id}"), &token_for(&author)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Deleting the review takes its comments with it.
    let app = common::build_test_app(pool.clone());
    let response = delete_auth(
        app,
        &format!("/api/v1/titles/{title_id}/reviews/{review_id}"),
        &token_for(&author),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0);
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_review_under_wrong_title_is_404(pool: PgPool) {
    let title_id = seed_title(&pool).await;
    let other_title: i64 =
        sqlx::query_scalar("INSERT INTO titles (name, year) VALUES ('Mirror', 1975) RETURNING id")
            .fetch_one(&pool)
            .await
            .unwrap();
    let author = create_user(&pool, "author", Role::User).await;

    let response = post_review(&pool, title_id, &token_for(&author), 6).await;
    let review_id = body_json(response).await["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/titles/{other_title}/reviews/{review_id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
