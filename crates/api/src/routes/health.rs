//! Liveness probe for load balancers and the deploy pipeline.

use std::time::Instant;

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// `GET /health` payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub service: &'static str,
    /// `ok` when PostgreSQL answers, `degraded` otherwise.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Round trip of the probe query; absent when it failed.
    pub db_latency_ms: Option<u64>,
    /// Whether confirmation codes go out over SMTP or only to the log.
    pub mail_transport: &'static str,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let started = Instant::now();
    let probe = yamdb_db::health_check(&state.pool).await;
    let db_latency_ms = match &probe {
        Ok(()) => Some(u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)),
        Err(e) => {
            tracing::warn!(error = %e, "Health probe could not reach the database");
            None
        }
    };
    let db_healthy = probe.is_ok();

    Json(HealthResponse {
        service: env!("CARGO_PKG_NAME"),
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        db_latency_ms,
        mail_transport: if state.config.mail.smtp.is_some() {
            "smtp"
        } else {
            "console"
        },
    })
}

/// Mounted at the root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
