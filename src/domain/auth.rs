//! Token issuing port

use std::fmt::Debug;

#[cfg(test)]
use mockall::automock;

use crate::domain::user::User;
use crate::domain::DomainError;

/// Trait for issuing authentication tokens for a user
#[cfg_attr(test, automock)]
pub trait TokenIssuer: Send + Sync + Debug {
    /// Issue a signed token identifying `user`
    fn issue(&self, user: &User) -> Result<String, DomainError>;
}
