// ABOUTME: Debounced message batching core for the lull gateway.
// ABOUTME: Coordinator, store, dispatcher, and the collaborator traits they consume.

pub mod debounce;
pub mod dispatcher;
pub mod message;
pub mod metrics;
pub mod store;
pub mod traits;

pub use debounce::Debouncer;
pub use dispatcher::{partition_by_agent, BatchDispatcher, FALLBACK_REPLY};
pub use message::{BatchKey, InboundMessage, DEFAULT_DEBOUNCE_MS, NO_SESSION};
pub use store::{DebounceStore, PendingGroup};
pub use traits::{AgentDirectory, BatchSink, KnowledgeSync, WebhookSender};

// Re-export lull-agent types for convenient access
pub use lull_agent::{AgentDefinition, AgentInvoker, AgentReply, InvokeRequest, Skill, Usage};
