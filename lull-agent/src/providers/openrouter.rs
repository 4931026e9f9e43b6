// ABOUTME: OpenRouter provider - routes prefixed models (openai/, anthropic/, ...) through
// ABOUTME: the OpenRouter chat-completions endpoint with bearer auth.

use crate::config::AgentDefinition;
use crate::providers::wire::chat_completion;
use crate::registry::InvokerFactory;
use crate::reply::{AgentReply, InvokeRequest};
use crate::traits::AgentInvoker;
use anyhow::Result;
use futures::future::BoxFuture;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Invoker backed by the OpenRouter API. Model strings are passed through
/// verbatim, so the agent's `openai/gpt-4o-mini`-style ids work unchanged.
pub struct OpenRouterInvoker {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl OpenRouterInvoker {
    pub fn new(api_key: Option<String>, base_url: Option<String>) -> Self {
        Self {
            base_url: base_url
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key,
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(120))
                .connect_timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    /// Factory function for the registry
    pub fn factory() -> InvokerFactory {
        Box::new(|config| {
            let api_key = config
                .get("api_key")
                .and_then(|v| v.as_str())
                .map(String::from);
            let base_url = config
                .get("base_url")
                .and_then(|v| v.as_str())
                .map(String::from);
            Ok(Arc::new(OpenRouterInvoker::new(api_key, base_url)))
        })
    }
}

impl AgentInvoker for OpenRouterInvoker {
    fn name(&self) -> &'static str {
        "openrouter"
    }

    fn invoke<'a>(
        &'a self,
        agent: &'a AgentDefinition,
        request: InvokeRequest,
    ) -> BoxFuture<'a, Result<AgentReply>> {
        Box::pin(async move {
            let (text, usage) = chat_completion(
                &self.client,
                &self.base_url,
                self.api_key.as_deref(),
                &agent.model,
                agent,
                &request,
            )
            .await?;

            let mut reply = AgentReply::from_text(text, &agent.id, &request);
            reply.usage = Some(usage);
            Ok(reply)
        })
    }
}
