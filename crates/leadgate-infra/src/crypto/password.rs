//! Argon2id password hashing with PHC-string storage.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::Argon2;

use leadgate_core::auth::password::PasswordHasher;
use leadgate_types::error::AuthError;

/// Argon2id implementation of the `PasswordHasher` trait.
///
/// Uses the library's default parameters and a random per-password salt.
/// The output PHC string embeds algorithm, parameters, and salt, so
/// verification needs no extra state.
#[derive(Default, Clone, Copy)]
pub struct Argon2PasswordHasher;

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, plain: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(plain.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }

    fn verify(&self, plain: &str, phc: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(phc) else {
            return false;
        };
        Argon2::default()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hasher = Argon2PasswordHasher::new();
        let phc = hasher.hash("correct horse battery staple").unwrap();

        assert!(phc.starts_with("$argon2id$"));
        assert!(hasher.verify("correct horse battery staple", &phc));
        assert!(!hasher.verify("wrong password", &phc));
    }

    #[test]
    fn test_same_password_different_salts() {
        let hasher = Argon2PasswordHasher::new();
        let a = hasher.hash("senha123").unwrap();
        let b = hasher.hash("senha123").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        let hasher = Argon2PasswordHasher::new();
        assert!(!hasher.verify("anything", "not-a-phc-string"));
        assert!(!hasher.verify("anything", ""));
    }
}
