// ABOUTME: Outbound webhook delivery for agent replies.
// ABOUTME: POSTs the reply payload to the agent's configured URL with a bounded timeout.

use anyhow::{Context, Result};
use async_trait::async_trait;
use lull_agent::AgentReply;
use lull_core::WebhookSender;
use std::time::Duration;

/// HTTP client for delivering replies to caller-supplied webhook URLs.
/// Delivery is best-effort: the dispatcher logs and swallows failures.
pub struct WebhookClient {
    client: reqwest::Client,
}

impl WebhookClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }
}

#[async_trait]
impl WebhookSender for WebhookClient {
    async fn deliver(&self, url: &str, reply: &AgentReply) -> Result<()> {
        let res = self
            .client
            .post(url)
            .json(reply)
            .send()
            .await
            .context("Webhook request failed")?;
        res.error_for_status().context("Webhook endpoint returned an error status")?;

        tracing::debug!(url = %url, agent_id = %reply.agent_id, "Webhook delivered");
        Ok(())
    }
}
