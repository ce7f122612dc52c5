//! Registration, login, and identity handlers.

use std::time::Instant;

use axum::extract::State;
use axum::Json;

use leadgate_types::user::{LoginRequest, RegisterRequest};

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/auth/register - Register a new user (public).
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let token = state.auth.register(body).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(serde_json::to_value(&token).unwrap(), request_id, elapsed)
        .with_link("me", "/api/v1/auth/me");

    Ok(Json(resp))
}

/// POST /api/v1/auth/login - Log in by email or handle (public).
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let token = state.auth.login(&body.identifier, &body.password).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(serde_json::to_value(&token).unwrap(), request_id, elapsed)
        .with_link("me", "/api/v1/auth/me");

    Ok(Json(resp))
}

/// GET /api/v1/auth/me - The principal behind the presented token.
pub async fn me(
    CurrentUser(principal): CurrentUser,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(
        serde_json::to_value(&principal).unwrap(),
        request_id,
        elapsed,
    );

    Ok(Json(resp))
}
