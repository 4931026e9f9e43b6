// ABOUTME: Batch dispatcher - drives drained batches through agent, knowledge, and webhook.
// ABOUTME: Failures are isolated per message; one bad message never aborts its siblings.

use crate::message::{BatchKey, InboundMessage};
use crate::metrics;
use crate::traits::{AgentDirectory, BatchSink, KnowledgeSync, WebhookSender};
use async_trait::async_trait;
use lull_agent::{AgentDefinition, AgentInvoker, AgentReply, InvokeRequest};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Fixed substitute reply used when the agent invocation fails.
pub const FALLBACK_REPLY: &str = "Sorry, something went wrong while processing your message.";

/// Processes drained batches: partitions by agent, invokes the agent once
/// per message in arrival order, records the turn, and delivers the reply.
pub struct BatchDispatcher {
    directory: Arc<dyn AgentDirectory>,
    invoker: Arc<dyn AgentInvoker>,
    knowledge: Arc<dyn KnowledgeSync>,
    webhook: Arc<dyn WebhookSender>,
}

impl BatchDispatcher {
    pub fn new(
        directory: Arc<dyn AgentDirectory>,
        invoker: Arc<dyn AgentInvoker>,
        knowledge: Arc<dyn KnowledgeSync>,
        webhook: Arc<dyn WebhookSender>,
    ) -> Self {
        Self {
            directory,
            invoker,
            knowledge,
            webhook,
        }
    }

    async fn process_message(&self, agent: &AgentDefinition, message: InboundMessage) {
        // Callers may omit the session id; the conversation still needs one
        // downstream, so mint it here.
        let session_id = message
            .session_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let tenant_id = message.tenant_id();

        let request = InvokeRequest {
            text: message.message.clone(),
            user_id: message.user_id.clone(),
            session_id: session_id.clone(),
            tenant_id: tenant_id.clone(),
        };

        let reply = match self.invoker.invoke(agent, request).await {
            Ok(reply) => {
                metrics::record_agent_invocation("ok");
                reply
            }
            Err(e) => {
                tracing::warn!(
                    agent_id = %agent.id,
                    user_id = %message.user_id,
                    error = %e,
                    "Agent invocation failed, substituting fallback reply"
                );
                metrics::record_agent_invocation("error");
                AgentReply {
                    messages: vec![FALLBACK_REPLY.to_string()],
                    transfer: false,
                    session_id: session_id.clone(),
                    user_id: message.user_id.clone(),
                    agent_id: agent.id.clone(),
                    custom: Vec::new(),
                    usage: None,
                }
            }
        };

        let reply_text = reply.messages.first().cloned().unwrap_or_default();
        if let Err(e) = self
            .knowledge
            .record_turn(
                &tenant_id,
                &message.user_id,
                &session_id,
                &message.message,
                &reply_text,
            )
            .await
        {
            tracing::warn!(tenant_id = %tenant_id, error = %e, "Failed to record conversation turn");
            metrics::record_knowledge_write("error");
        } else {
            metrics::record_knowledge_write("ok");
        }

        if !agent.webhook_url.is_empty() {
            if let Err(e) = self.webhook.deliver(&agent.webhook_url, &reply).await {
                tracing::warn!(
                    url = %agent.webhook_url,
                    agent_id = %agent.id,
                    error = %e,
                    "Webhook delivery failed"
                );
                metrics::record_webhook_delivery("error");
            } else {
                metrics::record_webhook_delivery("ok");
            }
        }

        tracing::debug!(
            agent_id = %agent.id,
            user_id = %message.user_id,
            session_id = %session_id,
            "Message processed"
        );
    }
}

#[async_trait]
impl BatchSink for BatchDispatcher {
    async fn flush(&self, key: BatchKey, messages: Vec<InboundMessage>) {
        if messages.is_empty() {
            return;
        }
        tracing::info!(key = %key, count = messages.len(), "Processing message batch");

        // A single key's batch is single-agent by construction; partitioning
        // keeps the contract robust if that ever changes.
        for (agent_id, batch) in partition_by_agent(messages) {
            let Some(agent) = self.directory.lookup(&agent_id) else {
                tracing::warn!(agent_id = %agent_id, "Agent not found, skipping its messages");
                metrics::record_agent_invocation("missing_agent");
                continue;
            };

            for message in batch {
                self.process_message(&agent, message).await;
            }
        }

        tracing::info!(key = %key, "Batch processed");
    }
}

/// Partition messages by agent id, preserving arrival order both across
/// agents (first-seen order) and within each agent's batch.
pub fn partition_by_agent(messages: Vec<InboundMessage>) -> Vec<(String, Vec<InboundMessage>)> {
    let mut order: Vec<String> = Vec::new();
    let mut by_agent: HashMap<String, Vec<InboundMessage>> = HashMap::new();

    for message in messages {
        let batch = by_agent.entry(message.agent_id.clone()).or_default();
        if batch.is_empty() {
            order.push(message.agent_id.clone());
        }
        batch.push(message);
    }

    order
        .into_iter()
        .map(|agent_id| {
            let batch = by_agent.remove(&agent_id).unwrap_or_default();
            (agent_id, batch)
        })
        .collect()
}
