use std::sync::Arc;

use yamdb_core::confirmation::CodeGenerator;

use crate::config::ServerConfig;
use crate::mail::Mailer;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: yamdb_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Outbound mail transport for confirmation codes.
    pub mailer: Arc<dyn Mailer>,
    /// Source of fresh confirmation codes.
    pub codes: Arc<dyn CodeGenerator>,
}
