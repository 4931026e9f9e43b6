// ABOUTME: Root library module exposing all public modules
// ABOUTME: Provides access to config, agents, API routes, knowledge, and webhook clients

pub mod agents;
pub mod api;
pub mod config;
pub mod knowledge;
pub mod server;
pub mod webhook;

// Re-export core types for convenience
pub use lull_core::{metrics, BatchKey, Debouncer, InboundMessage};

// Re-export lull-agent types for convenience
pub use lull_agent::{AgentDefinition, AgentReply, InvokerRegistry, Skill};
