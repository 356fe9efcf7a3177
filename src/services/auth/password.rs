//! One-way password hashing (Argon2id).
//!
//! The cost parameters are fixed here and never taken from client input.
//! Hashing is CPU-heavy, so the async entry points hop onto the blocking pool.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Default)]
pub struct CredentialHasher;

impl CredentialHasher {
    pub fn new() -> Self {
        Self
    }

    // 19 MiB, 2 passes, 1 lane
    fn argon2() -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::default())
    }

    pub fn hash_blocking(plaintext: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Self::argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::operational(format!("password hashing failed: {e}")))
    }

    /// False on mismatch and on a hash string that can't be parsed.
    pub fn verify_blocking(plaintext: &str, hashed: &str) -> bool {
        match PasswordHash::new(hashed) {
            Ok(parsed) => Self::argon2()
                .verify_password(plaintext.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    pub async fn hash(&self, plaintext: String) -> AppResult<String> {
        tokio::task::spawn_blocking(move || Self::hash_blocking(&plaintext))
            .await
            .map_err(|e| AppError::operational(format!("password hashing task failed: {e}")))?
    }

    pub async fn verify(&self, plaintext: String, hashed: String) -> bool {
        tokio::task::spawn_blocking(move || Self::verify_blocking(&plaintext, &hashed))
            .await
            .unwrap_or(false)
    }
}
