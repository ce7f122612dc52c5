//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/` except `/` and `/health`.
//! Middleware: CORS, tracing.

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Auth
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/me", get(handlers::auth::me))
        // Users
        .route("/users", get(handlers::user::list_users))
        .route("/users/{id}/status", put(handlers::user::update_user_status))
        // Lead CRUD
        .route("/leads", post(handlers::lead::create_lead))
        .route("/leads", get(handlers::lead::list_leads))
        .route("/leads/{id}", get(handlers::lead::get_lead))
        .route("/leads/{id}", put(handlers::lead::update_lead))
        .route("/leads/{id}", delete(handlers::lead::delete_lead))
        // Lead children (append-only)
        .route(
            "/leads/{id}/messages",
            post(handlers::lead::add_lead_message).get(handlers::lead::list_lead_messages),
        )
        .route(
            "/leads/{id}/calls",
            post(handlers::lead::add_lead_call).get(handlers::lead::list_lead_calls),
        )
        .route(
            "/leads/{id}/interactions",
            post(handlers::lead::add_lead_interaction)
                .get(handlers::lead::list_lead_interactions),
        )
        // Product CRUD
        .route("/products", post(handlers::product::create_product))
        .route("/products", get(handlers::product::list_products))
        .route("/products/{id}", get(handlers::product::get_product))
        .route("/products/{id}", put(handlers::product::update_product))
        .route("/products/{id}", delete(handlers::product::delete_product))
        // Auto message CRUD
        .route(
            "/auto-messages",
            post(handlers::auto_message::create_auto_message),
        )
        .route(
            "/auto-messages",
            get(handlers::auto_message::list_auto_messages),
        )
        .route(
            "/auto-messages/{id}",
            get(handlers::auto_message::get_auto_message),
        )
        .route(
            "/auto-messages/{id}",
            put(handlers::auto_message::update_auto_message),
        )
        .route(
            "/auto-messages/{id}",
            delete(handlers::auto_message::delete_auto_message),
        )
        // Metrics
        .route("/metrics", get(handlers::metrics::list_metrics))
        .route(
            "/metrics/{ano}/{mes}",
            put(handlers::metrics::upsert_metrics),
        )
        // Conversation
        .route("/chat", post(handlers::chat::chat_turn))
        // Voice
        .route("/voice/transcribe", post(handlers::voice::transcribe))
        .route("/voice/synthesize", post(handlers::voice::synthesize));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET / - Service banner (no auth required).
async fn root() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "service": "leadgate",
        "status": "ok",
    }))
}

/// GET /health - Simple health check endpoint (no auth required).
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
