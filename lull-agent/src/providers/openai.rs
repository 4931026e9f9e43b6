// ABOUTME: Native OpenAI provider for un-prefixed model ids.
// ABOUTME: Same chat-completions wire contract as OpenRouter, different host and auth key.

use crate::config::AgentDefinition;
use crate::providers::wire::chat_completion;
use crate::registry::InvokerFactory;
use crate::reply::{AgentReply, InvokeRequest};
use crate::traits::AgentInvoker;
use anyhow::Result;
use futures::future::BoxFuture;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

pub struct OpenAiInvoker {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl OpenAiInvoker {
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
            Ok(Arc::new(OpenAiInvoker::new(api_key, base_url)))
        })
    }
}

impl AgentInvoker for OpenAiInvoker {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn invoke<'a>(
        &'a self,
        agent: &'a AgentDefinition,
        request: InvokeRequest,
    ) -> BoxFuture<'a, Result<AgentReply>> {
        Box::pin(async move {
            // OpenRouter-style ids carry a provider prefix; the native API
            // expects the bare model name.
            let model = agent
                .model
                .strip_prefix("openai/")
                .unwrap_or(&agent.model)
                .to_string();

            let (text, usage) = chat_completion(
                &self.client,
                &self.base_url,
                self.api_key.as_deref(),
                &model,
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
