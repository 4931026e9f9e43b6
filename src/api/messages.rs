// ABOUTME: POST /messages handler - accepts a batch and feeds each message to the debouncer.
// ABOUTME: Returns immediately; processing outcome is only observable via webhook delivery.

use crate::server::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use lull_core::{metrics, BatchKey, InboundMessage};
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Serialize)]
pub struct ReceiveResponse {
    pub success: bool,
    pub message: String,
    pub debounce_groups: usize,
}

/// Number of distinct batch keys in one request's messages.
pub fn distinct_groups(messages: &[InboundMessage]) -> usize {
    messages
        .iter()
        .map(InboundMessage::batch_key)
        .collect::<HashSet<BatchKey>>()
        .len()
}

/// Handle POST /messages. An empty list is accepted and produces no groups
/// and no timers.
pub async fn receive_messages(
    State(state): State<AppState>,
    Json(messages): Json<Vec<InboundMessage>>,
) -> (StatusCode, Json<ReceiveResponse>) {
    let count = messages.len();
    let groups = distinct_groups(&messages);
    tracing::info!(count, groups, "Received message batch");
    metrics::record_messages_received(count);

    for message in messages {
        state.debouncer.submit(message);
    }

    (
        StatusCode::OK,
        Json(ReceiveResponse {
            success: true,
            message: format!("Batch of {} messages received and accepted", count),
            debounce_groups: groups,
        }),
    )
}
