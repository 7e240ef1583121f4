//! Tessera Server - Main entry point.

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tessera_api::AppState;
use tessera_config::Settings;

#[derive(Parser)]
#[command(name = "tessera-server")]
#[command(about = "Tessera - JWT login and token-gated file server")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/tessera.toml", env = "TESSERA_CONFIG")]
    config: String,

    /// Server bind address
    #[arg(long, default_value = "0.0.0.0:8080", env = "TESSERA_BIND_ADDRESS")]
    bind: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    tracing::info!("Starting Tessera server...");
    tracing::info!("Configuration: {}", cli.config);

    let settings = Settings::load(&cli.config)
        .with_context(|| format!("Failed to load settings from {}", cli.config))?;
    if settings.server.signature_secret.is_none() {
        tracing::warn!("No server-wide signature_secret; only locations declaring one can issue tokens");
    }

    let state = AppState::from_settings(settings).context("Failed to set up providers")?;
    let app = tessera_api::router(state);

    let listener = tokio::net::TcpListener::bind(&cli.bind)
        .await
        .with_context(|| format!("Failed to bind {}", cli.bind))?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
