// ABOUTME: Collaborator traits consumed by the debounce core.
// ABOUTME: The gateway crate provides the real implementations; tests provide fakes.

use crate::message::{BatchKey, InboundMessage};
use anyhow::Result;
use async_trait::async_trait;
use lull_agent::{AgentDefinition, AgentReply};

/// Receives drained batches from the coordinator when a flush fires.
#[async_trait]
pub trait BatchSink: Send + Sync {
    /// Process one drained batch. Must never panic; per-message failures are
    /// the sink's responsibility and must not propagate.
    async fn flush(&self, key: BatchKey, messages: Vec<InboundMessage>);
}

/// Read-only lookup of agent configuration by id.
pub trait AgentDirectory: Send + Sync {
    fn lookup(&self, agent_id: &str) -> Option<AgentDefinition>;
}

/// Records conversation turns in the external knowledge store. Best-effort:
/// callers log and swallow errors.
#[async_trait]
pub trait KnowledgeSync: Send + Sync {
    async fn record_turn(
        &self,
        tenant_id: &str,
        user_id: &str,
        session_id: &str,
        user_message: &str,
        bot_reply: &str,
    ) -> Result<()>;
}

/// Delivers a reply payload to a caller-supplied webhook URL. Best-effort:
/// callers log and swallow errors.
#[async_trait]
pub trait WebhookSender: Send + Sync {
    async fn deliver(&self, url: &str, reply: &AgentReply) -> Result<()>;
}
