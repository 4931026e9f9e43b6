// ABOUTME: Inbound message type and the batch key it is grouped under.
// ABOUTME: BatchKey::resolve is a pure function of (agent, user, session).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Sentinel session id for messages submitted without one, so that all
/// session-less traffic from the same (agent, user) pair coalesces.
pub const NO_SESSION: &str = "no_session";

/// Default debounce window when the caller does not request one.
pub const DEFAULT_DEBOUNCE_MS: u64 = 15_000;

/// One inbound chat message as accepted by the gateway. Immutable once
/// received; owned by the coordinator until dispatched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InboundMessage {
    /// Free-text message body.
    pub message: String,
    /// Target agent id.
    pub agent_id: String,
    pub user_id: String,
    /// Tenant account id; see [`InboundMessage::tenant_id`].
    pub account_id: String,
    /// Requested debounce window in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

impl InboundMessage {
    /// The batch key this message is grouped under.
    pub fn batch_key(&self) -> BatchKey {
        BatchKey::resolve(&self.agent_id, &self.user_id, self.session_id.as_deref())
    }

    /// Tenant namespace derived from the account id.
    pub fn tenant_id(&self) -> String {
        format!("tenant_{}", self.account_id)
    }

    /// Requested debounce window as a [`Duration`].
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Grouping identity for debouncing: (agent, user, session-or-placeholder).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BatchKey {
    pub agent_id: String,
    pub user_id: String,
    pub session_id: String,
}

impl BatchKey {
    /// Derive the key for a message. Pure and total: the same inputs always
    /// produce the same key, and a missing or blank session id maps to the
    /// [`NO_SESSION`] sentinel.
    pub fn resolve(agent_id: &str, user_id: &str, session_id: Option<&str>) -> Self {
        let session_id = match session_id {
            Some(s) if !s.trim().is_empty() => s.to_string(),
            _ => NO_SESSION.to_string(),
        };
        Self {
            agent_id: agent_id.to_string(),
            user_id: user_id.to_string(),
            session_id,
        }
    }
}

impl fmt::Display for BatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.agent_id, self.user_id, self.session_id)
    }
}
