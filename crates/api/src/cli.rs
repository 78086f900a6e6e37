//! Command-line interface of the `yamdb-api` binary.
//!
//! With no subcommand the binary serves HTTP. The superuser flag has no HTTP
//! route, so it is managed here.

use clap::{Parser, Subcommand};
use yamdb_core::accounts::normalize_username;
use yamdb_db::repositories::UserRepo;
use yamdb_db::DbPool;

#[derive(Debug, Parser)]
#[command(name = "yamdb-api")]
#[command(about = "YaMDb review service and its admin commands")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Start the web server (the default)
    Serve,
    /// Grant the superuser flag to an existing account
    SetSuperuser {
        /// Account username, matched case-insensitively
        username: String,

        /// Clear the flag instead of setting it
        #[arg(long)]
        revoke: bool,
    },
}

impl Cli {
    /// The subcommand to run, defaulting to [`Command::Serve`].
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }
}

/// Errors raised by administrative subcommands.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("No user named '{0}'")]
    UnknownUser(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Set or clear `is_superuser` on the account called `username`.
pub async fn set_superuser(pool: &DbPool, username: &str, grant: bool) -> Result<(), CommandError> {
    let username = normalize_username(username);
    let user = UserRepo::find_by_username(pool, &username)
        .await?
        .ok_or_else(|| CommandError::UnknownUser(username.clone()))?;

    UserRepo::set_superuser(pool, user.id, grant).await?;
    tracing::info!(user_id = user.id, %username, is_superuser = grant, "Superuser flag updated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_serves() {
        let cli = Cli::try_parse_from(["yamdb-api"]).unwrap();
        assert_eq!(cli.command(), Command::Serve);
    }

    #[test]
    fn test_set_superuser_parses_revoke_flag() {
        let cli = Cli::try_parse_from(["yamdb-api", "set-superuser", "Root", "--revoke"]).unwrap();
        assert_eq!(
            cli.command(),
            Command::SetSuperuser {
                username: "Root".into(),
                revoke: true,
            }
        );
    }

    #[test]
    fn test_set_superuser_requires_username() {
        assert!(Cli::try_parse_from(["yamdb-api", "set-superuser"]).is_err());
    }
}
