// ABOUTME: HTTP API router assembly - public endpoints, protected routes, shared response types.
// ABOUTME: Protected routes sit behind the X-API-Key middleware; tracing and CORS wrap everything.

pub mod agents;
pub mod auth;
pub mod knowledge;
pub mod messages;

use crate::server::AppState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{middleware, Json, Router};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Error body returned by handlers when a request cannot be served.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub success: bool,
    pub message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Build the full application router.
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/messages", post(messages::receive_messages))
        .route(
            "/agents",
            get(agents::list_agents).post(agents::create_agent),
        )
        .route(
            "/agents/{agent_id}",
            get(agents::get_agent)
                .put(agents::update_agent)
                .delete(agents::delete_agent),
        )
        .route("/knowledge/status", get(knowledge::knowledge_status))
        .route(
            "/knowledge/tenants/{tenant_id}/search",
            get(knowledge::search_tenant),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key,
        ));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/metrics", get(render_metrics))
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Handle GET / - service identity
async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "service": "lull",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
    }))
}

/// Handle GET /health - liveness plus a few gauge-style counts
async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "agents_count": state.agents.count(),
        "pending_batches": state.debouncer.pending_groups(),
        "knowledge_enabled": state.knowledge.is_enabled(),
    }))
}

/// Handle GET /metrics - returns Prometheus text format
async fn render_metrics(State(state): State<AppState>) -> impl IntoResponse {
    state.metrics_handle.render()
}
