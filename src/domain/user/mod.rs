//! User domain
//!
//! This module provides the user document, its field validation, password
//! material and the repository trait.

mod credentials;
mod entity;
mod repository;
mod validation;

pub use credentials::{Credentials, PasswordHasher};
pub use entity::{Role, User};
pub use repository::UserRepository;
pub use validation::{validate_email, validate_username};

#[cfg(test)]
pub use credentials::mock::PlainHasher;
