//! Password hashing service using PBKDF2-HMAC-SHA512

use rand::RngCore;
use sha2::Sha512;

use crate::constants::{PASSWORD_SALT_LENGTH, PBKDF2_ITERATIONS, PBKDF2_KEY_LENGTH};
use crate::di::Named;

/// Password hashing service
///
/// Hashes are hex encoded; salts are random bytes, hex encoded, and used
/// as text when deriving.
#[derive(Debug, Clone)]
pub struct PasswordService {
    iterations: u32,
}

impl PasswordService {
    /// Create a new password service with default configuration
    pub fn new() -> Self {
        Self {
            iterations: PBKDF2_ITERATIONS,
        }
    }

    /// Generate a random hex salt
    pub fn generate_salt(&self) -> String {
        let mut bytes = [0_u8; PASSWORD_SALT_LENGTH];
        rand::rng().fill_bytes(&mut bytes);
        hex::encode(bytes)
    }

    /// Derive the hex hash of `password` with `salt`
    pub fn hash_password(&self, password: &str, salt: &str) -> String {
        let mut key = [0_u8; PBKDF2_KEY_LENGTH];
        pbkdf2::pbkdf2_hmac::<Sha512>(password.as_bytes(), salt.as_bytes(), self.iterations, &mut key);
        hex::encode(key)
    }

    /// Whether `password` hashes to `hash` with `salt`
    pub fn verify_password(&self, password: &str, salt: &str, hash: &str) -> bool {
        self.hash_password(password, salt) == hash
    }
}

impl Named for PasswordService {
    const NAME: &'static str = "PasswordService";
}

impl Default for PasswordService {
    fn default() -> Self {
        Self::new()
    }
}
