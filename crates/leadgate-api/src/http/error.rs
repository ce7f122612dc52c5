//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use leadgate_types::error::{AuthError, ChatError, RepositoryError};
use leadgate_types::speech::SpeechError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Authentication and credential errors.
    Auth(AuthError),
    /// Persistence errors.
    Repository(RepositoryError),
    /// Conversation turn errors.
    Chat(ChatError),
    /// Speech provider errors.
    Speech(SpeechError),
    /// Missing or malformed credentials (before the auth service is even reached).
    Unauthorized(String),
    /// Validation error.
    Validation(String),
    /// Generic internal error.
    Internal(String),
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        AppError::Auth(e)
    }
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        AppError::Repository(e)
    }
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl From<SpeechError> for AppError {
    fn from(e: SpeechError) -> Self {
        AppError::Speech(e)
    }
}

impl AppError {
    /// Status code, machine code, and human message for this error.
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Auth(e) => match e {
                AuthError::InvalidToken => {
                    (StatusCode::UNAUTHORIZED, "INVALID_TOKEN", e.to_string())
                }
                AuthError::Expired => {
                    (StatusCode::UNAUTHORIZED, "TOKEN_EXPIRED", e.to_string())
                }
                AuthError::UnknownSubject => {
                    (StatusCode::UNAUTHORIZED, "UNKNOWN_SUBJECT", e.to_string())
                }
                AuthError::InvalidCredentials => {
                    (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS", e.to_string())
                }
                AuthError::Inactive => {
                    (StatusCode::UNAUTHORIZED, "USER_INACTIVE", e.to_string())
                }
                AuthError::DuplicateEmail(_) => {
                    (StatusCode::CONFLICT, "DUPLICATE_EMAIL", e.to_string())
                }
                AuthError::DuplicateHandle(_) => {
                    (StatusCode::CONFLICT, "DUPLICATE_HANDLE", e.to_string())
                }
                AuthError::KeyUserProtected => {
                    (StatusCode::FORBIDDEN, "KEY_USER_PROTECTED", e.to_string())
                }
                AuthError::Hashing(_) | AuthError::Storage(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "AUTH_ERROR", e.to_string())
                }
            },
            AppError::Repository(e) => match e {
                RepositoryError::NotFound => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", e.to_string())
                }
                RepositoryError::Conflict(_) => {
                    (StatusCode::CONFLICT, "CONFLICT", e.to_string())
                }
                RepositoryError::Connection | RepositoryError::Query(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", e.to_string())
                }
            },
            AppError::Chat(e) => match e {
                ChatError::EmptyMessage => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string())
                }
                ChatError::Provider(_) => {
                    (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", e.to_string())
                }
                ChatError::Persistence(RepositoryError::NotFound) => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", e.to_string())
                }
                ChatError::Persistence(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", e.to_string())
                }
            },
            AppError::Speech(e) => match e {
                SpeechError::InvalidAudio(_) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string())
                }
                SpeechError::NoSpeechRecognized => {
                    (StatusCode::BAD_REQUEST, "NO_SPEECH_RECOGNIZED", e.to_string())
                }
                SpeechError::Provider(_) => {
                    (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", e.to_string())
                }
            },
            AppError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
            }
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg.clone())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = json!({
            "data": null,
            "meta": {
                "request_id": "",
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "response_time_ms": 0
            },
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
