//! Credential primitives: Argon2id password hashing and HS256 tokens.

pub mod jwt;
pub mod password;

pub use jwt::JwtTokenService;
pub use password::Argon2PasswordHasher;
