//! Monthly metrics snapshot handlers.

use std::time::Instant;

use axum::extract::{Path, State};
use axum::Json;

use leadgate_core::repository::MetricsRepository;
use leadgate_types::metrics::UpsertMetricsRequest;

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/metrics - List all snapshots, newest period first.
pub async fn list_metrics(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<ApiResponse<Vec<serde_json::Value>>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let snapshots = state.metrics.list().await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let json: Vec<serde_json::Value> = snapshots
        .iter()
        .map(|s| serde_json::to_value(s).unwrap())
        .collect();

    let resp = ApiResponse::success(json, request_id, elapsed)
        .with_link("self", "/api/v1/metrics");

    Ok(Json(resp))
}

/// PUT /api/v1/metrics/:ano/:mes - Insert or overwrite a period's snapshot.
pub async fn upsert_metrics(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path((ano, mes)): Path<(i32, i32)>,
    Json(body): Json<UpsertMetricsRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    if !(1..=12).contains(&mes) {
        return Err(AppError::Validation(format!(
            "mes must be between 1 and 12, got {mes}"
        )));
    }

    let snapshot = state.metrics.upsert(ano, mes, &body).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(
        serde_json::to_value(&snapshot).unwrap(),
        request_id,
        elapsed,
    )
    .with_link("self", &format!("/api/v1/metrics/{ano}/{mes}"));

    Ok(Json(resp))
}
