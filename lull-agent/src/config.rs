// ABOUTME: Agent definition records - model, instructions, skills, webhook target.
// ABOUTME: Deserialized from the gateway API and TOML config with sensible defaults.

use serde::{Deserialize, Serialize};

/// Configuration record for one agent, looked up by id at dispatch time.
///
/// The invoker treats this as read-only context: it selects the model,
/// builds the system prompt from `instructions` plus matching skills, and
/// applies `temperature`/`max_tokens` to the completion request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentDefinition {
    /// Agent id. Empty on create requests; the gateway assigns a UUID.
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub instructions: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default)]
    pub skills: Vec<Skill>,
    /// Where replies for this agent are delivered. Empty disables delivery.
    #[serde(default)]
    pub webhook_url: String,
}

/// A skill is extra context injected into the system prompt when any of its
/// keywords appears in the user message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Skill {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub context: String,
}

fn default_model() -> String {
    "openai/gpt-4o-mini".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    1000
}
