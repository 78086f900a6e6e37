//! Signup and confirmation-code exchange against a real database.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json, FailingMailer, FixedCodes, RecordingMailer};
use serde_json::json;
use sqlx::PgPool;
use yamdb_db::repositories::UserRepo;

/// Signing up twice with the same pair keeps one account and mails the same code.
#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_signup_is_idempotent_for_same_pair(pool: PgPool) {
    let mailer = Arc::new(RecordingMailer::default());
    let body = json!({ "username": "Alice", "email": "alice@example.com" });

    for _ in 0..2 {
        let app = common::build_test_app_with(
            pool.clone(),
            mailer.clone(),
            Arc::new(FixedCodes("q1w2e3r4t5")),
        );
        let response = post_json(app, "/api/v1/auth/signup", body.clone()).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["username"], "alice");
        assert_eq!(json["email"], "alice@example.com");
    }

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);

    let sent = mailer.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].to, vec!["alice@example.com".to_string()]);
    assert!(sent[0].body.contains("q1w2e3r4t5"));
    assert_eq!(sent[0].body, sent[1].body);
}

/// A username already held with a different email is a conflict.
#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_signup_conflicts_on_taken_username(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/auth/signup",
        json!({ "username": "bob", "email": "bob@example.com" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/signup",
        json!({ "username": "bob", "email": "other@example.com" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// A failed send is a 500 but the new account stays.
#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_signup_mail_failure_keeps_account(pool: PgPool) {
    let app = common::build_test_app_with(
        pool.clone(),
        Arc::new(FailingMailer),
        Arc::new(FixedCodes("z9y8x7w6v5")),
    );
    let response = post_json(
        app,
        "/api/v1/auth/signup",
        json!({ "username": "carol", "email": "carol@example.com" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["code"], "MAIL_ERROR");

    let user = UserRepo::find_by_username(&pool, "carol").await.unwrap();
    assert!(user.is_some(), "account must survive a failed send");
}

/// Wrong code is a 400; the right one yields a token that authenticates.
#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_token_exchange(pool: PgPool) {
    let codes = Arc::new(FixedCodes("k1l2m3n4o5"));
    let app =
        common::build_test_app_with(pool.clone(), Arc::new(RecordingMailer::default()), codes);
    let response = post_json(
        app,
        "/api/v1/auth/signup",
        json!({ "username": "dave", "email": "dave@example.com" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/auth/token",
        json!({ "username": "dave", "confirmation_code": "K1L2M3N4O5" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/auth/token",
        json!({ "username": "dave", "confirmation_code": "k1l2m3n4o5" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let token = body_json(response).await["token"].as_str().unwrap().to_string();

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/users/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["username"], "dave");
    assert_eq!(json["role"], "user");
}

/// Unknown usernames are a 404 at the token endpoint.
#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_token_for_unknown_user_is_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/token",
        json!({ "username": "ghost", "confirmation_code": "a1b2c3d4e5" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_token_for_unknown_user_with_long_code_is_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/token",
        json!({ "username": "ghost", "confirmation_code": "a1b2c3d4e5f" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
