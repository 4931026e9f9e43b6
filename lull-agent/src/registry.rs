// ABOUTME: Registry pattern for runtime provider selection.
// ABOUTME: Providers register factories, the gateway creates one by name from config.

use crate::traits::AgentInvoker;
use anyhow::{anyhow, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Factory function that creates an invoker from config
pub type InvokerFactory = Box<dyn Fn(&Value) -> Result<Arc<dyn AgentInvoker>> + Send + Sync>;

/// Registry for runtime provider selection
pub struct InvokerRegistry {
    factories: HashMap<String, InvokerFactory>,
}

impl InvokerRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a provider factory by name
    pub fn register<F>(mut self, name: &str, factory: F) -> Self
    where
        F: Fn(&Value) -> Result<Arc<dyn AgentInvoker>> + Send + Sync + 'static,
    {
        self.factories.insert(name.to_string(), Box::new(factory));
        self
    }

    /// Create an invoker by provider name with the given config
    pub fn create(&self, name: &str, config: &Value) -> Result<Arc<dyn AgentInvoker>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| anyhow!("Unknown provider: {}", name))?;
        factory(config)
    }

    /// List available provider names
    pub fn available(&self) -> Vec<&str> {
        self.factories.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for InvokerRegistry {
    fn default() -> Self {
        use crate::providers::mock::MockInvoker;
        use crate::providers::openai::OpenAiInvoker;
        use crate::providers::openrouter::OpenRouterInvoker;

        Self::new()
            .register("mock", MockInvoker::factory())
            .register("openai", OpenAiInvoker::factory())
            .register("openrouter", OpenRouterInvoker::factory())
    }
}
