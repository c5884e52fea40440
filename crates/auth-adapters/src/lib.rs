//! # auth-adapters
//!
//! Argon2-based implementation of `PasswordHasher` and, behind the
//! `auth-jwt` feature, a stateless JWT implementation of `SessionTokens`.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier,
        SaltString},
    Argon2,
};
use domains::{Error, PasswordHasher, Result};

#[cfg(feature = "auth-jwt")]
pub mod jwt;
#[cfg(feature = "auth-jwt")]
pub use jwt::JwtSessions;

/// Argon2id hashing with per-password random salts.
#[derive(Default)]
pub struct Argon2PasswordHasher;

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| Error::Internal(anyhow::anyhow!("password hashing failed: {e}")))?;
        Ok(hash.to_string())
    }

    /// Verifies a password against a stored Argon2 hash. An unparsable
    /// stored hash counts as a failed verification, not an error.
    fn verify(&self, password: &str, hash: &str) -> bool {
        let parsed = match PasswordHash::new(hash) {
            Ok(p) => p,
            Err(_) => return false,
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}
