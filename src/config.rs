// ABOUTME: Configuration parsing from TOML file with environment variable overrides
// ABOUTME: Validates required fields and provides sensible defaults for optional ones

use anyhow::{Context, Result};
use lull_agent::AgentDefinition;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
    #[serde(default)]
    pub delivery: DeliveryConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_agent: Option<DefaultAgentConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Static API key checked against the X-API-Key header.
    pub api_key: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
        }
    }
}

// Custom Debug impl to redact the key
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider name: "openrouter", "openai", "mock"
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl LlmConfig {
    /// Provider config value handed to the invoker registry factory.
    pub fn provider_config(&self) -> Value {
        json!({
            "api_key": self.api_key,
            "base_url": self.base_url,
        })
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_key: None,
            base_url: None,
        }
    }
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryConfig {
    /// Timeout for outbound webhook deliveries, in seconds.
    #[serde(default = "default_delivery_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_delivery_timeout_secs(),
        }
    }
}

/// Seed values for the agent created at startup when the registry is empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultAgentConfig {
    #[serde(default = "default_agent_id")]
    pub id: String,
    #[serde(default = "default_agent_name")]
    pub name: String,
    #[serde(default = "default_agent_instructions")]
    pub instructions: String,
    #[serde(default = "default_agent_model")]
    pub model: String,
    #[serde(default)]
    pub webhook_url: String,
}

impl Default for DefaultAgentConfig {
    fn default() -> Self {
        Self {
            id: default_agent_id(),
            name: default_agent_name(),
            instructions: default_agent_instructions(),
            model: default_agent_model(),
            webhook_url: String::new(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_provider() -> String {
    "openrouter".to_string()
}

fn default_delivery_timeout_secs() -> u64 {
    30
}

fn default_agent_id() -> String {
    "default".to_string()
}

fn default_agent_name() -> String {
    "Default Assistant".to_string()
}

fn default_agent_instructions() -> String {
    "You are a helpful assistant. Answer clearly and concisely.".to_string()
}

fn default_agent_model() -> String {
    "openai/gpt-4o-mini".to_string()
}

impl Config {
    /// Load configuration from config.toml with environment variable overrides
    pub fn load() -> Result<Self> {
        let config_path =
            std::env::var("LULL_CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        let mut config = if Path::new(&config_path).exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path))?;
            toml::from_str::<Config>(&content)
                .with_context(|| format!("Failed to parse {}", config_path))?
        } else {
            // If no config file, start from defaults and rely on env vars
            Config {
                server: ServerConfig::default(),
                auth: AuthConfig {
                    api_key: String::new(),
                },
                llm: LlmConfig::default(),
                knowledge: KnowledgeConfig::default(),
                delivery: DeliveryConfig::default(),
                default_agent: None,
            }
        };

        // Override with environment variables if present
        if let Ok(val) = std::env::var("LULL_HOST") {
            config.server.host = val;
        }
        if let Ok(val) = std::env::var("LULL_PORT") {
            config.server.port = val
                .parse()
                .with_context(|| format!("LULL_PORT must be a valid port number, got: {}", val))?;
        }
        if let Ok(val) = std::env::var("API_KEY") {
            config.auth.api_key = val;
        }
        if let Ok(val) = std::env::var("LLM_PROVIDER") {
            config.llm.provider = val;
        }
        if let Ok(val) = std::env::var("LLM_API_KEY") {
            config.llm.api_key = Some(val);
        }
        if let Ok(val) = std::env::var("LLM_BASE_URL") {
            config.llm.base_url = Some(val);
        }
        if let Ok(val) = std::env::var("KNOWLEDGE_BASE_URL") {
            config.knowledge.base_url = Some(val);
            config.knowledge.enabled = true;
        }
        if let Ok(val) = std::env::var("KNOWLEDGE_API_KEY") {
            config.knowledge.api_key = Some(val);
        }
        if let Ok(val) = std::env::var("WEBHOOK_TIMEOUT_SECS") {
            config.delivery.timeout_secs = val.parse().with_context(|| {
                format!(
                    "WEBHOOK_TIMEOUT_SECS must be a number of seconds, got: {}",
                    val
                )
            })?;
        }

        // Provider-specific key env vars, matching what deployments already export
        if config.llm.api_key.is_none() {
            config.llm.api_key = match config.llm.provider.as_str() {
                "openrouter" => std::env::var("OPENROUTER_API_KEY").ok(),
                "openai" => std::env::var("OPENAI_API_KEY").ok(),
                _ => None,
            };
        }

        // Validate required fields
        if config.auth.api_key.trim().is_empty() {
            anyhow::bail!("auth.api_key is required (set in config.toml or API_KEY env var)");
        }
        if config.knowledge.enabled && config.knowledge.base_url.is_none() {
            anyhow::bail!(
                "knowledge.base_url is required when knowledge.enabled is true \
                 (set in config.toml or KNOWLEDGE_BASE_URL env var)"
            );
        }

        Ok(config)
    }

    /// Definition of the agent seeded at startup when the registry is empty.
    pub fn default_agent_definition(&self) -> AgentDefinition {
        let seed = self.default_agent.clone().unwrap_or_default();
        AgentDefinition {
            id: seed.id,
            name: seed.name,
            description: "Default agent for message processing".to_string(),
            instructions: seed.instructions,
            model: seed.model,
            temperature: 0.7,
            max_tokens: 1000,
            skills: Vec::new(),
            webhook_url: seed.webhook_url,
        }
    }
}
