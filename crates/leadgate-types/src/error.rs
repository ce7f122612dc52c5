use thiserror::Error;

/// Errors from authentication and credential operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid or malformed token")]
    InvalidToken,

    #[error("token expired")]
    Expired,

    #[error("token subject does not resolve to a known user")]
    UnknownSubject,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("user is inactive")]
    Inactive,

    #[error("email '{0}' already registered")]
    DuplicateEmail(String),

    #[error("handle '{0}' already taken")]
    DuplicateHandle(String),

    #[error("key users cannot be deactivated")]
    KeyUserProtected,

    #[error("password hashing error: {0}")]
    Hashing(String),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Errors from repository operations (used by trait definitions in leadgate-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors from a conversation turn.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("message cannot be empty")]
    EmptyMessage,

    #[error("chat provider error: {0}")]
    Provider(String),

    #[error("lead persistence error: {0}")]
    Persistence(#[from] RepositoryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_display() {
        let err = AuthError::DuplicateEmail("ana@example.com".to_string());
        assert_eq!(err.to_string(), "email 'ana@example.com' already registered");
    }

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }

    #[test]
    fn test_chat_error_wraps_repository_error() {
        let err: ChatError = RepositoryError::NotFound.into();
        assert!(err.to_string().contains("not found"));
    }
}
