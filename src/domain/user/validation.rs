//! User field validation

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::DomainError;

static USERNAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9]+$").unwrap());

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\S+@\S+\.\S+").unwrap());

/// Validate a username
///
/// Rules:
/// - Cannot be empty
/// - Only ASCII letters and digits
pub fn validate_username(username: &str) -> Result<(), DomainError> {
    if username.is_empty() {
        return Err(DomainError::blank("username"));
    }

    if !USERNAME_PATTERN.is_match(username) {
        return Err(DomainError::invalid("username"));
    }

    Ok(())
}

/// Validate an email address
///
/// Only checks for a local part, an `@` and a dotted domain.
pub fn validate_email(email: &str) -> Result<(), DomainError> {
    if email.is_empty() {
        return Err(DomainError::blank("email"));
    }

    if !EMAIL_PATTERN.is_match(email) {
        return Err(DomainError::invalid("email"));
    }

    Ok(())
}
