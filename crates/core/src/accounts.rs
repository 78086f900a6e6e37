//! Username and profile rules for accounts.

use crate::error::CoreError;

/* --------------------------------------------------------------------------
Constants
-------------------------------------------------------------------------- */

/// Path segment of the caller's own profile; can never be a username.
pub const RESERVED_USERNAME: &str = "me";

pub const MAX_USERNAME_LENGTH: usize = 150;

/* --------------------------------------------------------------------------
Validation functions
-------------------------------------------------------------------------- */

/// Usernames are stored lower-cased so lookups are case-insensitive.
pub fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}

/// Validate a username: 1..=150 characters of letters, digits and `.@+-_`,
/// and not the reserved profile segment.
pub fn validate_username(username: &str) -> Result<(), CoreError> {
    if username.is_empty() {
        return Err(CoreError::Validation("Username must not be empty".into()));
    }
    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Username must be at most {MAX_USERNAME_LENGTH} characters"
        )));
    }
    if let Some(bad) = username
        .chars()
        .find(|c| !(c.is_alphanumeric() || matches!(c, '_' | '.' | '@' | '+' | '-')))
    {
        return Err(CoreError::Validation(format!(
            "Username contains invalid character '{bad}'. Allowed: letters, digits and .@+-_"
        )));
    }
    if username.eq_ignore_ascii_case(RESERVED_USERNAME) {
        return Err(CoreError::Validation(format!(
            "Username '{RESERVED_USERNAME}' is reserved"
        )));
    }
    Ok(())
}
