//! Argon2id password hashing.
//!
//! Hashing and verification are CPU-heavy, so both run on the blocking pool.

use crate::error::{IdentityError, Result};
use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher as _, PasswordVerifier as _};
use rand::rngs::OsRng;
use std::sync::Arc;
use tokio::sync::OnceCell;

#[derive(Clone, Default)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    /// Hash checked against when the account does not exist
    dummy_hash: Arc<OnceCell<String>>,
}

impl PasswordHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash `password` with a fresh random salt, returning a PHC string.
    pub async fn hash(&self, password: &str) -> Result<String> {
        let password = password.to_string();
        let argon2 = self.argon2.clone();

        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            argon2
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|e| IdentityError::HashingError(e.to_string()))
        })
        .await
        .map_err(|e| IdentityError::HashingError(format!("hashing task failed: {e}")))?
    }

    /// `Ok(false)` on a wrong password, `Err` only when `hash` is unreadable.
    pub async fn verify(&self, password: &str, hash: &str) -> Result<bool> {
        let password = password.to_string();
        let hash = hash.to_string();
        let argon2 = self.argon2.clone();

        tokio::task::spawn_blocking(move || {
            let parsed = PasswordHash::new(&hash)
                .map_err(|e| IdentityError::HashingError(e.to_string()))?;

            match argon2.verify_password(password.as_bytes(), &parsed) {
                Ok(()) => Ok(true),
                Err(argon2::password_hash::Error::Password) => Ok(false),
                Err(e) => Err(IdentityError::HashingError(e.to_string())),
            }
        })
        .await
        .map_err(|e| IdentityError::HashingError(format!("verification task failed: {e}")))?
    }

    /// Verify against a throwaway hash and answer `false`.
    ///
    /// Logins for unknown emails go through here so they take as long as a
    /// wrong password for a real account.
    pub async fn verify_unknown(&self, password: &str) -> Result<bool> {
        let dummy = self
            .dummy_hash
            .get_or_try_init(|| self.hash("no-such-account"))
            .await?;
        self.verify(password, dummy).await?;
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_round_trips_and_hides_password() {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash("s3cret-pass").await.unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("s3cret-pass"));
        assert!(hasher.verify("s3cret-pass", &hash).await.unwrap());
        assert!(!hasher.verify("wrong-pass", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_same_password_gets_distinct_salts() {
        let hasher = PasswordHasher::new();
        let first = hasher.hash("repeat-me").await.unwrap();
        let second = hasher.hash("repeat-me").await.unwrap();

        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_unknown_account_never_verifies() {
        let hasher = PasswordHasher::new();

        assert!(!hasher.verify_unknown("no-such-account").await.unwrap());
        assert!(!hasher.verify_unknown("s3cret-pass").await.unwrap());

        // Clones share the throwaway hash instead of deriving a new one.
        let clone = hasher.clone();
        assert!(!clone.verify_unknown("s3cret-pass").await.unwrap());
        assert!(Arc::ptr_eq(&hasher.dummy_hash, &clone.dummy_hash));
        assert!(hasher.dummy_hash.get().is_some());
    }

    #[tokio::test]
    async fn test_malformed_hash_is_an_error() {
        let hasher = PasswordHasher::new();
        let result = hasher.verify("anything", "plain-text-password").await;

        assert!(matches!(result, Err(IdentityError::HashingError(_))));
    }
}
