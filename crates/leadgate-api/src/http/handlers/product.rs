//! Product catalog handlers.

use std::time::Instant;

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use uuid::Uuid;

use leadgate_core::repository::ProductRepository;
use leadgate_types::error::RepositoryError;
use leadgate_types::product::{CreateProductRequest, Product, UpdateProductRequest};

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/products - Create a product.
pub async fn create_product(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(body): Json<CreateProductRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let product = Product {
        id: Uuid::now_v7(),
        nome: body.nome,
        descricao: body.descricao,
        publico_alvo: body.publico_alvo,
        dores: body.dores,
        beneficios: body.beneficios,
        palavras_chave: body.palavras_chave,
        link_compra: body.link_compra,
        ativo: body.ativo,
        criado_em: Utc::now(),
    };
    state.products.create(&product).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(
        serde_json::to_value(&product).unwrap(),
        request_id,
        elapsed,
    )
    .with_link("self", &format!("/api/v1/products/{}", product.id));

    Ok(Json(resp))
}

/// GET /api/v1/products - List all products.
pub async fn list_products(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<ApiResponse<Vec<serde_json::Value>>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let products = state.products.list().await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let json: Vec<serde_json::Value> = products
        .iter()
        .map(|p| serde_json::to_value(p).unwrap())
        .collect();

    let resp = ApiResponse::success(json, request_id, elapsed)
        .with_link("self", "/api/v1/products");

    Ok(Json(resp))
}

/// GET /api/v1/products/:id - Get a product by id.
pub async fn get_product(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let product = state
        .products
        .get(&id)
        .await?
        .ok_or(AppError::Repository(RepositoryError::NotFound))?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(
        serde_json::to_value(&product).unwrap(),
        request_id,
        elapsed,
    )
    .with_link("self", &format!("/api/v1/products/{id}"));

    Ok(Json(resp))
}

/// PUT /api/v1/products/:id - Apply a partial update.
pub async fn update_product(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateProductRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let product = state.products.update(&id, &body).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(
        serde_json::to_value(&product).unwrap(),
        request_id,
        elapsed,
    )
    .with_link("self", &format!("/api/v1/products/{id}"));

    Ok(Json(resp))
}

/// DELETE /api/v1/products/:id - Delete a product.
pub async fn delete_product(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    state.products.delete(&id).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(ApiResponse::success(
        serde_json::json!({ "deleted": id }),
        request_id,
        elapsed,
    )))
}
