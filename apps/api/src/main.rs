mod config;
mod errors;
mod export;
mod extraction;
mod llm_client;
mod routes;
mod state;
mod structure;
mod tailoring;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::export::Exporter;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::structure::LineClassifier;
use crate::tailoring::{LlmTailor, ResumeTailor};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Tailor API v{}", env!("CARGO_PKG_VERSION"));

    let exporter = Arc::new(Exporter::new(LineClassifier::new(
        config.heading_policy.clone(),
    )));
    info!(
        max_heading_len = config.heading_policy.max_heading_len,
        keywords = config.heading_policy.keywords.len(),
        "Heading policy loaded"
    );

    let tailor: Option<Arc<dyn ResumeTailor>> = match &config.anthropic_api_key {
        Some(key) => {
            let llm = LlmClient::new(key.clone())?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Some(Arc::new(LlmTailor::new(llm)))
        }
        None => {
            warn!("ANTHROPIC_API_KEY not set, tailoring disabled");
            None
        }
    };

    let state = AppState {
        config: config.clone(),
        exporter,
        tailor,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
