// ABOUTME: HTTP client for the external knowledge-graph/vector store.
// ABOUTME: Records conversation turns and proxies tenant-scoped searches; best-effort by design.

use crate::config::KnowledgeConfig;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use lull_core::KnowledgeSync;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Client for the knowledge store's HTTP API. When the store is not
/// configured the client is disabled: writes succeed as no-ops and searches
/// report the store as unavailable.
pub struct KnowledgeClient {
    enabled: bool,
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct KnowledgeStatus {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// One conversation turn as posted to the store.
#[derive(Debug, Serialize)]
struct TurnRecord<'a> {
    tenant_id: &'a str,
    user_id: &'a str,
    session_id: &'a str,
    timestamp: String,
    user_message: &'a str,
    bot_reply: &'a str,
}

impl KnowledgeClient {
    pub fn new(config: &KnowledgeConfig) -> Self {
        let base_url = config
            .base_url
            .as_deref()
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_default();
        Self {
            enabled: config.enabled && !base_url.is_empty(),
            base_url,
            api_key: config.api_key.clone(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn status(&self) -> KnowledgeStatus {
        KnowledgeStatus {
            enabled: self.enabled,
            base_url: if self.enabled {
                Some(self.base_url.clone())
            } else {
                None
            },
        }
    }

    /// Search the store within one tenant's namespace.
    pub async fn search(&self, tenant_id: &str, query: &str) -> Result<Value> {
        if !self.enabled {
            return Err(anyhow!("knowledge store is not configured"));
        }

        let url = format!("{}/search", self.base_url);
        let mut req = self
            .client
            .get(&url)
            .query(&[("tenant_id", tenant_id), ("query", query)]);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let res = req.send().await.context("Knowledge search request failed")?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(anyhow!("knowledge search failed: {} {}", status, body));
        }
        res.json().await.context("Knowledge search returned invalid JSON")
    }
}

#[async_trait]
impl KnowledgeSync for KnowledgeClient {
    async fn record_turn(
        &self,
        tenant_id: &str,
        user_id: &str,
        session_id: &str,
        user_message: &str,
        bot_reply: &str,
    ) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let record = TurnRecord {
            tenant_id,
            user_id,
            session_id,
            timestamp: Utc::now().to_rfc3339(),
            user_message,
            bot_reply,
        };

        let url = format!("{}/add", self.base_url);
        let mut req = self.client.post(&url).json(&record);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let res = req.send().await.context("Knowledge write request failed")?;
        res.error_for_status()
            .context("Knowledge store rejected the turn")?;

        tracing::debug!(tenant_id = %tenant_id, session_id = %session_id, "Conversation turn recorded");
        Ok(())
    }
}
