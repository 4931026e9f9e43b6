// ABOUTME: Request and reply types exchanged with agent invokers.
// ABOUTME: AgentReply doubles as the outbound webhook payload shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Context passed to an invoker alongside the agent definition.
#[derive(Debug, Clone)]
pub struct InvokeRequest {
    /// The user message text.
    pub text: String,
    pub user_id: String,
    pub session_id: String,
    pub tenant_id: String,
}

/// The agent's answer for one message. Serialized verbatim as the webhook
/// payload delivered to the agent's configured URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentReply {
    /// Reply texts, first entry is the primary answer.
    pub messages: Vec<String>,
    /// Whether the agent asked to hand the conversation to a human.
    pub transfer: bool,
    pub session_id: String,
    pub user_id: String,
    pub agent_id: String,
    /// Provider- or agent-specific extra fields, passed through untouched.
    #[serde(default)]
    pub custom: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl AgentReply {
    /// Build a plain text reply carrying the identifiers from `request`.
    pub fn from_text(text: impl Into<String>, agent_id: &str, request: &InvokeRequest) -> Self {
        Self {
            messages: vec![text.into()],
            transfer: false,
            session_id: request.session_id.clone(),
            user_id: request.user_id.clone(),
            agent_id: agent_id.to_string(),
            custom: Vec::new(),
            usage: None,
        }
    }
}

/// Token usage reported by the provider for one completion.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub model: String,
}
