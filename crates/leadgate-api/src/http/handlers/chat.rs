//! Conversational turn handler.

use std::time::Instant;

use axum::extract::State;
use axum::Json;

use leadgate_types::chat::ChatTurnRequest;

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/chat - Run one conversation turn.
///
/// Omitting `session_id` starts a fresh session; the allocated id rides
/// back in the response for the client to resend on later turns.
pub async fn chat_turn(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(body): Json<ChatTurnRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let turn = state.engine.process_turn(&body).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(serde_json::to_value(&turn).unwrap(), request_id, elapsed)
        .with_link("self", "/api/v1/chat");

    Ok(Json(resp))
}
