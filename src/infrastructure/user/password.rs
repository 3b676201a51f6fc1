//! Password hashing using PBKDF2-HMAC-SHA512

use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha512;

use crate::domain::user::PasswordHasher;
use crate::domain::DomainError;

/// Default number of PBKDF2 rounds
pub const DEFAULT_ITERATIONS: u32 = 10_000;

/// Default derived key length in bytes
pub const DEFAULT_KEY_LENGTH: usize = 512;

/// Default salt length in bytes
pub const DEFAULT_SALT_LENGTH: usize = 16;

/// PBKDF2-based password hasher
///
/// Salts and hashes are hex encoded, so a default hash is 1024 characters.
#[derive(Debug, Clone)]
pub struct Pbkdf2Hasher {
    iterations: u32,
    key_length: usize,
    salt_length: usize,
}

impl Default for Pbkdf2Hasher {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            key_length: DEFAULT_KEY_LENGTH,
            salt_length: DEFAULT_SALT_LENGTH,
        }
    }
}

impl Pbkdf2Hasher {
    /// Create a hasher with the default parameters
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_key_length(mut self, key_length: usize) -> Self {
        self.key_length = key_length;
        self
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn key_length(&self) -> usize {
        self.key_length
    }
}

impl PasswordHasher for Pbkdf2Hasher {
    fn generate_salt(&self) -> String {
        let mut salt = vec![0u8; self.salt_length];
        OsRng.fill_bytes(&mut salt);
        hex::encode(salt)
    }

    fn derive(&self, password: &str, salt: &str) -> Result<String, DomainError> {
        if self.iterations == 0 {
            return Err(DomainError::credential("Iteration count must be positive"));
        }

        if self.key_length == 0 {
            return Err(DomainError::credential("Key length must be positive"));
        }

        let mut key = vec![0u8; self.key_length];
        pbkdf2_hmac::<Sha512>(password.as_bytes(), salt.as_bytes(), self.iterations, &mut key);

        Ok(hex::encode(key))
    }
}
