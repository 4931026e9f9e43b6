// ABOUTME: Shared application state wiring config, agents, debouncer, and clients together.
// ABOUTME: AppState::initialize builds the whole processing pipeline once at startup.

use crate::agents::AgentStore;
use crate::config::Config;
use crate::knowledge::KnowledgeClient;
use crate::webhook::WebhookClient;
use anyhow::{Context, Result};
use lull_agent::InvokerRegistry;
use lull_core::{metrics, BatchDispatcher, Debouncer};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;

/// Shared server state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub agents: Arc<AgentStore>,
    pub debouncer: Arc<Debouncer>,
    pub knowledge: Arc<KnowledgeClient>,
    pub metrics_handle: PrometheusHandle,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("agents", &"<AgentStore>")
            .field("debouncer", &"<Debouncer>")
            .field("knowledge", &"<KnowledgeClient>")
            .finish()
    }
}

impl AppState {
    /// Initialize all server components: metrics, agent registry, the
    /// provider invoker, downstream clients, and the debounce pipeline.
    pub fn initialize(config: Config) -> Result<Self> {
        let metrics_handle =
            metrics::init_metrics().context("Failed to initialize Prometheus metrics")?;

        let agents = Arc::new(AgentStore::new());
        if let Some(record) = agents.seed_default(config.default_agent_definition()) {
            tracing::info!(agent_id = %record.definition.id, "Seeded default agent");
        }

        let registry = InvokerRegistry::default();
        let invoker = registry
            .create(&config.llm.provider, &config.llm.provider_config())
            .with_context(|| format!("Failed to create LLM provider '{}'", config.llm.provider))?;
        if config.llm.api_key.is_none() && config.llm.provider != "mock" {
            tracing::warn!(
                provider = %config.llm.provider,
                "No LLM API key configured - agent invocations will fail and fall back"
            );
        }

        let knowledge = Arc::new(KnowledgeClient::new(&config.knowledge));
        if knowledge.is_enabled() {
            tracing::info!("Knowledge store client initialized");
        } else {
            tracing::info!("Knowledge store not configured - turns will not be recorded");
        }

        let webhook = Arc::new(WebhookClient::new(Duration::from_secs(
            config.delivery.timeout_secs,
        )));

        let dispatcher = Arc::new(BatchDispatcher::new(
            agents.clone(),
            invoker,
            knowledge.clone(),
            webhook,
        ));
        let debouncer = Arc::new(Debouncer::new(dispatcher));
        tracing::info!(provider = %config.llm.provider, "Debounce pipeline initialized");

        Ok(Self {
            config: Arc::new(config),
            agents,
            debouncer,
            knowledge,
            metrics_handle,
        })
    }
}
