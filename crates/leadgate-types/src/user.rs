//! User identity types.
//!
//! A user authenticates with email-or-handle plus password and receives a
//! bearer token. The first registered user is auto-granted admin and
//! key-user flags; key users can never be deactivated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user of the Leadgate backend.
///
/// The password hash is a PHC string (argon2id) and is never serialized
/// into API responses -- handlers convert to [`UserSummary`] first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    /// Unique login handle.
    pub handle: String,
    /// Unique email, also the token subject.
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_active: bool,
    pub is_admin: bool,
    pub is_key_user: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Public view of this user, safe to serialize into responses.
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            name: self.name.clone(),
            handle: self.handle.clone(),
            email: self.email.clone(),
            is_active: self.is_active,
            is_admin: self.is_admin,
            is_key_user: self.is_key_user,
        }
    }
}

/// User fields exposed over the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub handle: String,
    pub email: String,
    pub is_active: bool,
    pub is_admin: bool,
    pub is_key_user: bool,
}

/// Registration request body.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub handle: String,
    pub email: String,
    pub password: String,
}

/// Login request body. The identifier matches either email or handle.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub identifier: String,
    pub password: String,
}

/// Successful login/registration response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: UserSummary,
}

/// Status-toggle request body for PUT /users/{id}/status.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserStatusRequest {
    pub is_active: bool,
}

/// The authenticated caller resolved from a bearer token.
#[derive(Debug, Clone, Serialize)]
pub struct Principal {
    pub user_id: Uuid,
    pub email: String,
    pub is_admin: bool,
    pub is_key_user: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User {
            id: Uuid::now_v7(),
            name: "Ana Silva".to_string(),
            handle: "ana".to_string(),
            email: "ana@example.com".to_string(),
            password_hash: "$argon2id$v=19$secret".to_string(),
            is_active: true,
            is_admin: false,
            is_key_user: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let json = serde_json::to_string(&test_user()).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("password_hash"));
    }

    #[test]
    fn test_summary_carries_flags() {
        let mut user = test_user();
        user.is_key_user = true;
        let summary = user.summary();
        assert!(summary.is_key_user);
        assert!(!summary.is_admin);
        assert_eq!(summary.email, user.email);
    }
}
