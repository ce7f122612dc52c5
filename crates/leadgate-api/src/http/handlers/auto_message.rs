//! Automatic message template handlers.

use std::time::Instant;

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use uuid::Uuid;

use leadgate_core::repository::AutoMessageRepository;
use leadgate_types::auto_message::{
    AutoMessage, CreateAutoMessageRequest, UpdateAutoMessageRequest,
};
use leadgate_types::error::RepositoryError;

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/auto-messages - Create a message template.
pub async fn create_auto_message(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(body): Json<CreateAutoMessageRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let message = AutoMessage {
        id: Uuid::now_v7(),
        nome: body.nome,
        conteudo: body.conteudo,
        ativo: body.ativo,
        criado_em: Utc::now(),
    };
    state.auto_messages.create(&message).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(
        serde_json::to_value(&message).unwrap(),
        request_id,
        elapsed,
    )
    .with_link("self", &format!("/api/v1/auto-messages/{}", message.id));

    Ok(Json(resp))
}

/// GET /api/v1/auto-messages - List all templates.
pub async fn list_auto_messages(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<ApiResponse<Vec<serde_json::Value>>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let messages = state.auto_messages.list().await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let json: Vec<serde_json::Value> = messages
        .iter()
        .map(|m| serde_json::to_value(m).unwrap())
        .collect();

    let resp = ApiResponse::success(json, request_id, elapsed)
        .with_link("self", "/api/v1/auto-messages");

    Ok(Json(resp))
}

/// GET /api/v1/auto-messages/:id - Get a template by id.
pub async fn get_auto_message(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let message = state
        .auto_messages
        .get(&id)
        .await?
        .ok_or(AppError::Repository(RepositoryError::NotFound))?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(
        serde_json::to_value(&message).unwrap(),
        request_id,
        elapsed,
    )
    .with_link("self", &format!("/api/v1/auto-messages/{id}"));

    Ok(Json(resp))
}

/// PUT /api/v1/auto-messages/:id - Apply a partial update.
pub async fn update_auto_message(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateAutoMessageRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let message = state.auto_messages.update(&id, &body).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(
        serde_json::to_value(&message).unwrap(),
        request_id,
        elapsed,
    )
    .with_link("self", &format!("/api/v1/auto-messages/{id}"));

    Ok(Json(resp))
}

/// DELETE /api/v1/auto-messages/:id - Delete a template.
pub async fn delete_auto_message(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    state.auto_messages.delete(&id).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(ApiResponse::success(
        serde_json::json!({ "deleted": id }),
        request_id,
        elapsed,
    )))
}
