//! Password material stored on a user

use std::fmt::Debug;

use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use crate::domain::DomainError;

/// Trait for salted one-way password derivation
pub trait PasswordHasher: Send + Sync + Debug {
    /// Generate a fresh random salt
    fn generate_salt(&self) -> String;

    /// Derive the hash for `password` under `salt`
    fn derive(&self, password: &str, salt: &str) -> Result<String, DomainError>;

    /// Recompute the hash and compare it in constant time
    fn verify(&self, password: &str, salt: &str, hash: &str) -> bool {
        match self.derive(password, salt) {
            Ok(candidate) => candidate.as_bytes().ct_eq(hash.as_bytes()).into(),
            Err(_) => false,
        }
    }
}

/// Salt and derived hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    salt: String,
    hash: String,
}

impl Credentials {
    /// Derive credentials for `password` under a freshly generated salt
    pub fn generate(hasher: &dyn PasswordHasher, password: &str) -> Result<Self, DomainError> {
        let salt = hasher.generate_salt();
        let hash = hasher.derive(password, &salt)?;
        Ok(Self { salt, hash })
    }

    pub fn salt(&self) -> &str {
        &self.salt
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn matches(&self, hasher: &dyn PasswordHasher, password: &str) -> bool {
        hasher.verify(password, &self.salt, &self.hash)
    }
}
