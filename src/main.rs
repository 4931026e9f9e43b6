// ABOUTME: Main entry point for the lull gateway server
// ABOUTME: Initializes logging, config, the debounce pipeline, and the HTTP listener

use anyhow::{Context, Result};
use clap::Parser;
use lull::api;
use lull::config::Config;
use lull::server::AppState;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "lull", about = "Multi-tenant LLM agent gateway with debounced batching")]
struct Args {
    /// Path to the config file (defaults to config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the configured bind host
    #[arg(long)]
    host: Option<String>,
    /// Override the configured bind port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting lull gateway");

    let args = Args::parse();
    if let Some(path) = &args.config {
        std::env::set_var("LULL_CONFIG_PATH", path);
    }

    // Load configuration
    dotenvy::dotenv().ok();
    let mut config = Config::load()?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    tracing::info!(
        host = %config.server.host,
        port = config.server.port,
        provider = %config.llm.provider,
        knowledge_enabled = config.knowledge.enabled,
        "Configuration loaded"
    );

    let state = AppState::initialize(config)?;
    let app = api::build_router(state.clone());

    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    tracing::info!(addr = %addr, "Starting gateway server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Flush whatever is still pending so queued messages are not lost
    tracing::info!("Server stopped, draining pending batches");
    state.debouncer.shutdown().await;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
