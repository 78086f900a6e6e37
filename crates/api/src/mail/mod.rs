//! Outbound mail for confirmation codes.
//!
//! [`Mailer`] is the transport seam. [`SmtpMailer`] relays through an SMTP
//! server via `lettre`; [`ConsoleMailer`] writes the message to the log and is
//! used when `SMTP_HOST` is not configured.

mod console;
mod smtp;

use std::sync::Arc;

use async_trait::async_trait;

pub use console::ConsoleMailer;
pub use smtp::SmtpMailer;

use crate::config::{env_or, ConfigError};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for mail delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// Message + transport trait
// ---------------------------------------------------------------------------

/// A single plain-text message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub subject: String,
    pub body: String,
    pub from: String,
    pub to: Vec<String>,
}

impl OutgoingMail {
    /// Message carrying a signup confirmation code.
    pub fn confirmation_code(from: &str, to: &str, code: &str) -> Self {
        Self {
            subject: CONFIRMATION_SUBJECT.to_string(),
            body: format!("Your confirmation code: {code}"),
            from: from.to_string(),
            to: vec![to.to_string()],
        }
    }
}

/// Subject line of confirmation-code messages.
pub const CONFIRMATION_SUBJECT: &str = "Confirmation code";

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError>;
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `MAIL_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@yamdb.local";

#[derive(Debug, Clone)]
pub struct MailConfig {
    /// RFC 5322 "From" address.
    pub from_address: String,
    /// Relay settings; `None` selects the console mailer.
    pub smtp: Option<SmtpConfig>,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl MailConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable        | Required | Default                |
    /// |-----------------|----------|------------------------|
    /// | `MAIL_FROM`     | no       | `noreply@yamdb.local`  |
    /// | `SMTP_HOST`     | no       | unset: console mailer  |
    /// | `SMTP_PORT`     | no       | `587`                  |
    /// | `SMTP_USER`     | no       | --                     |
    /// | `SMTP_PASSWORD` | no       | --                     |
    pub fn from_env() -> Result<Self, ConfigError> {
        let from_address =
            std::env::var("MAIL_FROM").unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string());

        let smtp = match std::env::var("SMTP_HOST") {
            Ok(host) if !host.trim().is_empty() => Some(SmtpConfig {
                host,
                port: env_or("SMTP_PORT", DEFAULT_SMTP_PORT)?,
                user: std::env::var("SMTP_USER").ok(),
                password: std::env::var("SMTP_PASSWORD").ok(),
            }),
            _ => None,
        };

        Ok(Self { from_address, smtp })
    }
}

/// Pick the transport for this configuration.
pub fn build_mailer(config: &MailConfig) -> Result<Arc<dyn Mailer>, MailError> {
    match &config.smtp {
        Some(smtp) => Ok(Arc::new(SmtpMailer::new(smtp)?)),
        None => {
            tracing::warn!("SMTP_HOST not set, confirmation codes will only be logged");
            Ok(Arc::new(ConsoleMailer))
        }
    }
}
