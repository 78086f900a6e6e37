//! Handlers for the `/auth` resource: signup and confirmation-code exchange.
//!
//! Signup creates the account (or finds the existing one for the same
//! username and email) and mails its confirmation code. The token endpoint
//! trades that code for an access token. Codes are not rotated on use.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;
use yamdb_core::accounts::{normalize_username, validate_username};
use yamdb_core::confirmation::codes_match;
use yamdb_db::models::user::{CreateUser, User};
use yamdb_db::repositories::UserRepo;

use crate::auth::jwt::generate_access_token;
use crate::error::{AppError, AppResult};
use crate::extract::ValidJson;
use crate::mail::OutgoingMail;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/signup`.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    #[validate(email, length(max = 254))]
    pub email: String,
}

/// Echo of the registered identity.
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub username: String,
    pub email: String,
}

/// Request body for `POST /auth/token`.
#[derive(Debug, Deserialize, Validate)]
pub struct TokenRequest {
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    #[validate(length(min = 1))]
    pub confirmation_code: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/signup
///
/// Register `(username, email)` or re-send the code of the account that
/// already holds exactly that pair. A username or email taken by a different
/// account is a 409. If the message cannot be sent the call fails, but a newly
/// created account is kept.
pub async fn signup(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<SignupRequest>,
) -> AppResult<Json<SignupResponse>> {
    let username = normalize_username(&input.username);
    validate_username(&username)?;
    let email = input.email.trim().to_string();

    let user = match UserRepo::find_by_username_and_email(&state.pool, &username, &email).await? {
        Some(existing) => {
            tracing::info!(user_id = existing.id, "Re-sending confirmation code");
            existing
        }
        None => {
            let code = state.codes.generate();
            let new_user = CreateUser {
                username,
                email,
                first_name: String::new(),
                last_name: String::new(),
                bio: String::new(),
                role: None,
            };
            let user = UserRepo::create(&state.pool, &new_user, &code).await?;
            tracing::info!(user_id = user.id, username = %user.username, "Account registered");
            user
        }
    };

    send_confirmation_code(&state, &user).await?;

    Ok(Json(SignupResponse {
        username: user.username,
        email: user.email,
    }))
}

/// POST /api/v1/auth/token
///
/// Exchange a confirmation code for an access token. Unknown usernames are a
/// 404; a wrong code is a 400.
pub async fn token(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<TokenRequest>,
) -> AppResult<Json<TokenResponse>> {
    let username = normalize_username(&input.username);
    let user = UserRepo::find_by_username(&state.pool, &username)
        .await?
        .ok_or_else(|| AppError::not_found("User", &username))?;

    if !codes_match(&user.confirmation_code, &input.confirmation_code) {
        tracing::warn!(user_id = user.id, "Rejected confirmation code");
        return Err(AppError::validation("Invalid confirmation code"));
    }

    let token = generate_access_token(user.id, user.role.as_str(), &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, "Access token issued");
    Ok(Json(TokenResponse { token }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Mail the account's current confirmation code to its email address.
async fn send_confirmation_code(state: &AppState, user: &User) -> AppResult<()> {
    let mail = OutgoingMail::confirmation_code(
        &state.config.mail.from_address,
        &user.email,
        &user.confirmation_code,
    );
    state.mailer.send(&mail).await?;
    tracing::info!(user_id = user.id, "Confirmation code dispatched");
    Ok(())
}
