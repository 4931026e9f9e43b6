// ABOUTME: Prometheus metrics initialization and recording helpers.
// ABOUTME: Counters and gauges for message intake, batch flushes, and downstream outcomes.

use anyhow::{Context, Result};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the global Prometheus recorder and return the render handle.
/// Call once at startup; the handle backs the `/metrics` endpoint.
pub fn init_metrics() -> Result<PrometheusHandle> {
    PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus metrics recorder")
}

/// Count messages accepted by the intake endpoint.
pub fn record_messages_received(count: usize) {
    counter!("lull_messages_received_total").increment(count as u64);
}

/// Count one flushed batch and record its size.
pub fn record_batch_flushed(size: usize) {
    counter!("lull_batches_flushed_total").increment(1);
    histogram!("lull_batch_size").record(size as f64);
}

/// Count an agent invocation by outcome ("ok", "error", "missing_agent").
pub fn record_agent_invocation(outcome: &'static str) {
    counter!("lull_agent_invocations_total", "outcome" => outcome).increment(1);
}

/// Count a knowledge store write by outcome.
pub fn record_knowledge_write(outcome: &'static str) {
    counter!("lull_knowledge_writes_total", "outcome" => outcome).increment(1);
}

/// Count an outbound webhook delivery by outcome.
pub fn record_webhook_delivery(outcome: &'static str) {
    counter!("lull_webhook_deliveries_total", "outcome" => outcome).increment(1);
}

/// Track how many batch keys are currently accumulating.
pub fn set_pending_groups(count: u64) {
    gauge!("lull_pending_groups").set(count as f64);
}
