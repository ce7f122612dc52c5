//! Lead CRUD and lead-children handlers.

use std::time::Instant;

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use uuid::Uuid;

use leadgate_core::repository::LeadRepository;
use leadgate_types::error::RepositoryError;
use leadgate_types::lead::{
    CreateLeadCallRequest, CreateLeadInteractionRequest, CreateLeadMessageRequest,
    CreateLeadRequest, Lead, LeadCall, LeadInteraction, LeadMessage, LeadStatus,
    UpdateLeadRequest,
};

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/leads - Create a lead from a form submission.
pub async fn create_lead(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(body): Json<CreateLeadRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let lead = Lead {
        id: Uuid::now_v7(),
        nome: body.nome,
        email: body.email,
        telefone: body.telefone,
        empresa: body.empresa,
        setor: body.setor,
        interesse: body.interesse,
        mensagem: body.mensagem,
        instagram_id: body.instagram_id,
        facebook_id: body.facebook_id,
        canal_origem: body.canal_origem,
        origem: body.origem,
        status: LeadStatus::default(),
        produto_sugerido: None,
        respondeu: false,
        tentou_chamada: false,
        ativo: true,
        criado_em: Utc::now(),
    };
    state.leads.create(&lead).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(serde_json::to_value(&lead).unwrap(), request_id, elapsed)
        .with_link("self", &format!("/api/v1/leads/{}", lead.id))
        .with_link("messages", &format!("/api/v1/leads/{}/messages", lead.id));

    Ok(Json(resp))
}

/// GET /api/v1/leads - List all leads, newest first.
pub async fn list_leads(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<ApiResponse<Vec<serde_json::Value>>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let leads = state.leads.list().await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let leads_json: Vec<serde_json::Value> = leads
        .iter()
        .map(|l| serde_json::to_value(l).unwrap())
        .collect();

    let resp = ApiResponse::success(leads_json, request_id, elapsed)
        .with_link("self", "/api/v1/leads");

    Ok(Json(resp))
}

/// GET /api/v1/leads/:id - Get a lead by id.
pub async fn get_lead(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let lead = state
        .leads
        .get(&id)
        .await?
        .ok_or(AppError::Repository(RepositoryError::NotFound))?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(serde_json::to_value(&lead).unwrap(), request_id, elapsed)
        .with_link("self", &format!("/api/v1/leads/{id}"))
        .with_link("messages", &format!("/api/v1/leads/{id}/messages"))
        .with_link("calls", &format!("/api/v1/leads/{id}/calls"))
        .with_link("interactions", &format!("/api/v1/leads/{id}/interactions"));

    Ok(Json(resp))
}

/// PUT /api/v1/leads/:id - Apply a partial update.
pub async fn update_lead(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateLeadRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let lead = state.leads.update(&id, &body).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(serde_json::to_value(&lead).unwrap(), request_id, elapsed)
        .with_link("self", &format!("/api/v1/leads/{id}"));

    Ok(Json(resp))
}

/// DELETE /api/v1/leads/:id - Delete a lead and its children.
pub async fn delete_lead(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    state.leads.delete(&id).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(
        serde_json::json!({ "deleted": id }),
        request_id,
        elapsed,
    );

    Ok(Json(resp))
}

/// Resolve the parent lead or fail with 404, so child appends against a
/// missing lead never surface as a foreign-key error.
async fn require_lead(state: &AppState, id: &Uuid) -> Result<(), AppError> {
    state
        .leads
        .get(id)
        .await?
        .map(|_| ())
        .ok_or(AppError::Repository(RepositoryError::NotFound))
}

/// POST /api/v1/leads/:id/messages - Append a message record.
pub async fn add_lead_message(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<CreateLeadMessageRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    require_lead(&state, &id).await?;
    let message = LeadMessage {
        id: Uuid::now_v7(),
        lead_id: id,
        canal: body.canal,
        origem: body.origem,
        conteudo: body.conteudo,
        data_envio: Utc::now(),
    };
    state.leads.add_message(&message).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(
        serde_json::to_value(&message).unwrap(),
        request_id,
        elapsed,
    )
    .with_link("lead", &format!("/api/v1/leads/{id}"));

    Ok(Json(resp))
}

/// GET /api/v1/leads/:id/messages - List a lead's messages.
pub async fn list_lead_messages(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<serde_json::Value>>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    require_lead(&state, &id).await?;
    let messages = state.leads.list_messages(&id).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let json: Vec<serde_json::Value> = messages
        .iter()
        .map(|m| serde_json::to_value(m).unwrap())
        .collect();

    Ok(Json(ApiResponse::success(json, request_id, elapsed)))
}

/// POST /api/v1/leads/:id/calls - Append a call record.
pub async fn add_lead_call(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<CreateLeadCallRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    require_lead(&state, &id).await?;
    let call = LeadCall {
        id: Uuid::now_v7(),
        lead_id: id,
        numero: body.numero,
        status: body.status,
        data_chamada: Utc::now(),
    };
    state.leads.add_call(&call).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(serde_json::to_value(&call).unwrap(), request_id, elapsed)
        .with_link("lead", &format!("/api/v1/leads/{id}"));

    Ok(Json(resp))
}

/// GET /api/v1/leads/:id/calls - List a lead's call attempts.
pub async fn list_lead_calls(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<serde_json::Value>>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    require_lead(&state, &id).await?;
    let calls = state.leads.list_calls(&id).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let json: Vec<serde_json::Value> = calls
        .iter()
        .map(|c| serde_json::to_value(c).unwrap())
        .collect();

    Ok(Json(ApiResponse::success(json, request_id, elapsed)))
}

/// POST /api/v1/leads/:id/interactions - Append an interaction record.
pub async fn add_lead_interaction(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<CreateLeadInteractionRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    require_lead(&state, &id).await?;
    let interaction = LeadInteraction {
        id: Uuid::now_v7(),
        lead_id: id,
        tipo: body.tipo,
        canal: body.canal,
        conteudo: body.conteudo,
        data_interacao: Utc::now(),
    };
    state.leads.add_interaction(&interaction).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(
        serde_json::to_value(&interaction).unwrap(),
        request_id,
        elapsed,
    )
    .with_link("lead", &format!("/api/v1/leads/{id}"));

    Ok(Json(resp))
}

/// GET /api/v1/leads/:id/interactions - List a lead's interactions.
pub async fn list_lead_interactions(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<serde_json::Value>>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    require_lead(&state, &id).await?;
    let interactions = state.leads.list_interactions(&id).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let json: Vec<serde_json::Value> = interactions
        .iter()
        .map(|i| serde_json::to_value(i).unwrap())
        .collect();

    Ok(Json(ApiResponse::success(json, request_id, elapsed)))
}
