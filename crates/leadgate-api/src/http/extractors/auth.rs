//! Bearer-token authentication extractor.
//!
//! The single authorization gate for non-public routes: extracting
//! [`CurrentUser`] pulls the token from `Authorization: Bearer <jwt>` and
//! resolves it through `AuthService::authenticate`.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use leadgate_types::user::Principal;

use crate::http::error::AppError;
use crate::state::AppState;

/// The authenticated caller. Extracting this validates the bearer token.
pub struct CurrentUser(pub Principal);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer(parts)?;
        let principal = state.auth.authenticate(&token).await?;
        Ok(CurrentUser(principal))
    }
}

/// Pull the token out of the `Authorization: Bearer <jwt>` header.
fn extract_bearer(parts: &Parts) -> Result<String, AppError> {
    let Some(auth) = parts.headers.get("authorization") else {
        return Err(AppError::Unauthorized(
            "Missing credentials. Provide 'Authorization: Bearer <token>'.".to_string(),
        ));
    };

    let auth_str = auth.to_str().map_err(|_| {
        AppError::Unauthorized("Invalid Authorization header encoding".to_string())
    })?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(AppError::Unauthorized(
            "Expected 'Authorization: Bearer <token>'".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/v1/leads");
        if let Some(v) = value {
            builder = builder.header("authorization", v);
        }
        let (parts, ()) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[test]
    fn test_extract_bearer_happy_path() {
        let parts = parts_with_auth(Some("Bearer abc.def.ghi"));
        assert_eq!(extract_bearer(&parts).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_extract_bearer_missing_header() {
        let parts = parts_with_auth(None);
        assert!(matches!(
            extract_bearer(&parts).unwrap_err(),
            AppError::Unauthorized(_)
        ));
    }

    #[test]
    fn test_extract_bearer_wrong_scheme() {
        let parts = parts_with_auth(Some("Basic dXNlcjpwYXNz"));
        assert!(matches!(
            extract_bearer(&parts).unwrap_err(),
            AppError::Unauthorized(_)
        ));
    }

    #[test]
    fn test_extract_bearer_empty_token() {
        let parts = parts_with_auth(Some("Bearer   "));
        assert!(matches!(
            extract_bearer(&parts).unwrap_err(),
            AppError::Unauthorized(_)
        ));
    }
}
