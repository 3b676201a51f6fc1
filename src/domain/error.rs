use thiserror::Error;

/// Message attached to a missing required field
pub const BLANK: &str = "can't be blank";

/// Message attached to a field that fails its pattern
pub const INVALID: &str = "is invalid";

/// Message attached to a uniqueness violation
pub const TAKEN: &str = "is already taken";

/// Core domain errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Validation error: {field} {message}")]
    Validation { field: String, message: String },

    #[error("Conflict: {field} {message}")]
    Conflict { field: String, message: String },

    #[error("Connection error: {message}")]
    Connection { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Unresolved reference: {field} '{id}' is not loaded")]
    UnresolvedReference { field: String, id: String },

    #[error("Credential error: {message}")]
    Credential { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl DomainError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn blank(field: impl Into<String>) -> Self {
        Self::validation(field, BLANK)
    }

    pub fn invalid(field: impl Into<String>) -> Self {
        Self::validation(field, INVALID)
    }

    /// Uniqueness violation on `field`
    pub fn conflict(field: impl Into<String>) -> Self {
        Self::Conflict {
            field: field.into(),
            message: TAKEN.to_string(),
        }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn unresolved(field: impl Into<String>, id: impl ToString) -> Self {
        Self::UnresolvedReference {
            field: field.into(),
            id: id.to_string(),
        }
    }

    pub fn credential(message: impl Into<String>) -> Self {
        Self::Credential {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Field a validation or conflict error refers to
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. }
            | Self::Conflict { field, .. }
            | Self::UnresolvedReference { field, .. } => Some(field),
            _ => None,
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}
