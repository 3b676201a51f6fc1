//! User infrastructure module
//!
//! Provides the PBKDF2 password hasher used to set and check user passwords.

mod password;

pub use password::{Pbkdf2Hasher, DEFAULT_ITERATIONS, DEFAULT_KEY_LENGTH, DEFAULT_SALT_LENGTH};
