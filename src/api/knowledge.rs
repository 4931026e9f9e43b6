// ABOUTME: Knowledge store endpoints - client status and tenant-scoped search proxy.
// ABOUTME: Search failures surface as 502 since the store is an upstream dependency.

use crate::api::ApiError;
use crate::knowledge::KnowledgeStatus;
use crate::server::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: String,
}

/// Handle GET /knowledge/status
pub async fn knowledge_status(State(state): State<AppState>) -> Json<KnowledgeStatus> {
    Json(state.knowledge.status())
}

/// Handle GET /knowledge/tenants/{tenant_id}/search
pub async fn search_tenant(
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Value>, (StatusCode, Json<ApiError>)> {
    match state.knowledge.search(&tenant_id, &params.query).await {
        Ok(results) => Ok(Json(json!({
            "tenant_id": tenant_id,
            "query": params.query,
            "results": results,
        }))),
        Err(e) => {
            tracing::error!(tenant_id = %tenant_id, error = %e, "Knowledge search failed");
            Err((
                StatusCode::BAD_GATEWAY,
                Json(ApiError::new(format!("Knowledge search failed: {}", e))),
            ))
        }
    }
}
