mod analysis;
mod config;
mod errors;
mod llm_client;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::analyzer::Analyzer;
use crate::config::Config;
use crate::llm_client::{CompletionClient, OpenAiClient};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first; only malformed values are fatal
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Match API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client (absent without OPENAI_API_KEY)
    let llm: Option<Arc<dyn CompletionClient>> = match OpenAiClient::from_config(&config)? {
        Some(client) => {
            info!("LLM client initialized (model: {})", client.model());
            Some(Arc::new(client))
        }
        None => None,
    };

    let state = AppState {
        analyzer: Analyzer::new(llm),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
