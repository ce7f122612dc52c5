//! TokenService trait and claim set.

use leadgate_types::error::AuthError;
use serde::{Deserialize, Serialize};

/// Claims embedded in an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's email.
    pub sub: String,
    /// Expiry as a Unix timestamp (fixed TTL from configuration).
    pub exp: i64,
}

/// Trait for signed, tamper-evident access tokens.
///
/// The concrete implementation (HS256 via jsonwebtoken) lives in
/// leadgate-infra.
pub trait TokenService: Send + Sync {
    /// Issue a token for a subject with the configured TTL.
    fn issue(&self, subject: &str) -> Result<String, AuthError>;

    /// Verify signature and expiry, returning the embedded claims.
    ///
    /// Fails with `AuthError::Expired` past TTL and
    /// `AuthError::InvalidToken` for anything else wrong with the token.
    fn decode(&self, token: &str) -> Result<Claims, AuthError>;
}
