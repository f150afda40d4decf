mod config;
mod errors;
mod extraction;
mod llm_client;
mod models;
mod render;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{BackendConfig, Config};
use crate::extraction::backend::LlmResumeExtractor;
use crate::extraction::gateway::{ResumeExtractionGateway, ResumeExtractor};
use crate::extraction::observer::{ExtractionObserver, TracingObserver};
use crate::extraction::remote::RemoteExtractor;
use crate::extraction::view_model::{ExtractionViewModel, ViewModelOptions};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Extractor v{}", env!("CARGO_PKG_VERSION"));

    let extractor: Arc<dyn ResumeExtractor> = match &config.backend {
        BackendConfig::Anthropic { api_key, api_url } => {
            info!("Extraction backend: LLM (model: {})", llm_client::MODEL);
            Arc::new(LlmResumeExtractor::new(LlmClient::new(
                api_key.clone(),
                api_url.clone(),
            )))
        }
        BackendConfig::Remote { base_url } => {
            info!("Extraction backend: remote origin at {base_url}");
            Arc::new(RemoteExtractor::new(base_url))
        }
    };

    let observer: Arc<dyn ExtractionObserver> = Arc::new(TracingObserver);
    let gateway = ResumeExtractionGateway::new(extractor, observer.clone())
        .with_deadline(config.extraction_timeout);
    info!(
        "Extraction deadline: {}s, initial load: {:?}",
        config.extraction_timeout.as_secs(),
        config.initial_load
    );

    let view_model = ExtractionViewModel::spawn(
        gateway.clone(),
        observer,
        ViewModelOptions {
            initial_load: config.initial_load,
            ..ViewModelOptions::default()
        },
    );

    // Build app state
    let state = AppState {
        gateway,
        view_model,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the page and API are deployed separately

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
