//! PasswordHasher trait definition.

use leadgate_types::error::AuthError;

/// Trait for one-way, salted password hashing.
///
/// The concrete implementation (Argon2id, PHC strings) lives in
/// leadgate-infra.
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password into a salted PHC string.
    fn hash(&self, plain: &str) -> Result<String, AuthError>;

    /// Verify a plaintext password against a stored PHC string.
    ///
    /// Uses the hashing library's verifier, which compares digests rather
    /// than plaintext. Returns false for malformed hashes.
    fn verify(&self, plain: &str, phc: &str) -> bool;
}
