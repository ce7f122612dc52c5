//! User administration handlers.

use std::time::Instant;

use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use leadgate_types::error::{AuthError, RepositoryError};
use leadgate_types::user::UpdateUserStatusRequest;

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/users - List all users.
pub async fn list_users(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<ApiResponse<Vec<serde_json::Value>>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let users = state.auth.list_users().await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let users_json: Vec<serde_json::Value> = users
        .iter()
        .map(|u| serde_json::to_value(u).unwrap())
        .collect();

    let resp = ApiResponse::success(users_json, request_id, elapsed)
        .with_link("self", "/api/v1/users");

    Ok(Json(resp))
}

/// PUT /api/v1/users/:id/status - Toggle a user's active flag.
///
/// Key users can never be deactivated.
pub async fn update_user_status(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateUserStatusRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    // An unknown id here is a missing resource, not a credential problem.
    let summary = state
        .auth
        .set_user_active(&id, body.is_active)
        .await
        .map_err(|e| match e {
            AuthError::UnknownSubject => AppError::Repository(RepositoryError::NotFound),
            other => other.into(),
        })?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(
        serde_json::to_value(&summary).unwrap(),
        request_id,
        elapsed,
    );

    Ok(Json(resp))
}
