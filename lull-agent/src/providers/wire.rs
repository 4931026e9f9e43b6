// ABOUTME: Chat-completions wire types and request helper shared by the HTTP providers.
// ABOUTME: Covers the OpenAI-compatible POST {base}/chat/completions contract.

use crate::config::AgentDefinition;
use crate::prompt::build_system_prompt;
use crate::reply::{InvokeRequest, Usage};
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<UsageInfo>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct UsageInfo {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

/// Run one non-streaming chat completion and return the assistant text plus
/// token usage. `model` is passed through verbatim; auth is a bearer token
/// when `api_key` is set.
pub(crate) async fn chat_completion(
    client: &reqwest::Client,
    base_url: &str,
    api_key: Option<&str>,
    model: &str,
    agent: &AgentDefinition,
    request: &InvokeRequest,
) -> Result<(String, Usage)> {
    let url = format!("{}/chat/completions", base_url.trim_end_matches('/'));
    let body = ChatRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage {
                role: "system".to_string(),
                content: build_system_prompt(agent, &request.text),
            },
            ChatMessage {
                role: "user".to_string(),
                content: request.text.clone(),
            },
        ],
        temperature: agent.temperature,
        max_tokens: agent.max_tokens,
    };

    let mut req = client.post(&url).json(&body);
    if let Some(key) = api_key {
        req = req.bearer_auth(key);
    }

    tracing::debug!(model = %model, url = %url, "Sending chat completion request");
    let res = req.send().await?;
    if !res.status().is_success() {
        let status = res.status();
        let text = res.text().await.unwrap_or_default();
        return Err(anyhow!("chat completion failed: {} {}", status, text));
    }

    let parsed: ChatResponse = res.json().await?;
    let content = parsed
        .choices
        .first()
        .map(|c| c.message.content.clone())
        .ok_or_else(|| anyhow!("chat completion returned no choices"))?;

    let usage = parsed
        .usage
        .map(|u| Usage {
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
            model: model.to_string(),
        })
        .unwrap_or_else(|| Usage {
            model: model.to_string(),
            ..Usage::default()
        });

    Ok((content, usage))
}
