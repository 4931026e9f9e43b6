// ABOUTME: API key middleware for the protected route group.
// ABOUTME: Compares the X-API-Key header against the configured key; 401 JSON on mismatch.

use crate::api::ApiError;
use crate::server::AppState;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Whether `provided` matches the configured key. The key is validated
/// non-empty at config load, so an absent header can never match.
pub fn key_matches(expected: &str, provided: Option<&str>) -> bool {
    match provided {
        Some(key) => key == expected,
        None => false,
    }
}

/// Middleware guarding the protected routes.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let provided = request
        .headers()
        .get("x-api-key")
        .and_then(|v| v.to_str().ok());

    if key_matches(&state.config.auth.api_key, provided) {
        return next.run(request).await;
    }

    tracing::warn!(path = %request.uri().path(), "Rejected request with missing or invalid API key");
    metrics::counter!("lull_auth_failures_total").increment(1);
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiError::new("Invalid or missing API key")),
    )
        .into_response()
}
