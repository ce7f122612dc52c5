//! HS256 access tokens via jsonwebtoken.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};

use leadgate_core::auth::token::{Claims, TokenService};
use leadgate_types::error::AuthError;

/// HS256 implementation of the `TokenService` trait.
///
/// The signing secret is held behind `SecretString` so it never shows up
/// in Debug output or logs.
pub struct JwtTokenService {
    secret: SecretString,
    ttl_minutes: i64,
}

impl JwtTokenService {
    pub fn new(secret: SecretString, ttl_minutes: i64) -> Self {
        Self {
            secret,
            ttl_minutes,
        }
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, subject: &str) -> Result<String, AuthError> {
        let claims = Claims {
            sub: subject.to_string(),
            exp: (Utc::now() + Duration::minutes(self.ttl_minutes)).timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.expose_secret().as_bytes()),
        )
        .map_err(|_| AuthError::InvalidToken)
    }

    fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.expose_secret().as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|err| match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
            _ => AuthError::InvalidToken,
        })
    }
}
