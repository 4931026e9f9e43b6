// ABOUTME: CRUD handlers for the in-memory agent registry.
// ABOUTME: 404 on unknown ids, 409 on duplicate create, timestamps maintained by the store.

use crate::agents::AgentRecord;
use crate::api::ApiError;
use crate::server::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use lull_agent::AgentDefinition;
use serde_json::{json, Value};
use uuid::Uuid;

/// Handle GET /agents
pub async fn list_agents(State(state): State<AppState>) -> Json<Vec<AgentRecord>> {
    Json(state.agents.list())
}

/// Handle GET /agents/{agent_id}
pub async fn get_agent(
    State(state): State<AppState>,
    Path(agent_id): Path<String>,
) -> Result<Json<AgentRecord>, (StatusCode, Json<ApiError>)> {
    state.agents.get(&agent_id).map(Json).ok_or((
        StatusCode::NOT_FOUND,
        Json(ApiError::new("Agent not found")),
    ))
}

/// Handle POST /agents
pub async fn create_agent(
    State(state): State<AppState>,
    Json(mut definition): Json<AgentDefinition>,
) -> Result<Json<AgentRecord>, (StatusCode, Json<ApiError>)> {
    if definition.id.trim().is_empty() {
        definition.id = Uuid::new_v4().to_string();
    }

    match state.agents.create(definition) {
        Some(record) => {
            tracing::info!(agent_id = %record.definition.id, "Agent created");
            Ok(Json(record))
        }
        None => Err((
            StatusCode::CONFLICT,
            Json(ApiError::new("Agent already exists")),
        )),
    }
}

/// Handle PUT /agents/{agent_id}
pub async fn update_agent(
    State(state): State<AppState>,
    Path(agent_id): Path<String>,
    Json(definition): Json<AgentDefinition>,
) -> Result<Json<AgentRecord>, (StatusCode, Json<ApiError>)> {
    match state.agents.update(&agent_id, definition) {
        Some(record) => {
            tracing::info!(agent_id = %agent_id, "Agent updated");
            Ok(Json(record))
        }
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ApiError::new("Agent not found")),
        )),
    }
}

/// Handle DELETE /agents/{agent_id}
pub async fn delete_agent(
    State(state): State<AppState>,
    Path(agent_id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<ApiError>)> {
    if state.agents.remove(&agent_id) {
        tracing::info!(agent_id = %agent_id, "Agent removed");
        Ok(Json(json!({
            "success": true,
            "message": "Agent removed",
        })))
    } else {
        Err((
            StatusCode::NOT_FOUND,
            Json(ApiError::new("Agent not found")),
        ))
    }
}
