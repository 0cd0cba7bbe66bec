mod config;
mod errors;
mod llm_client;
mod models;
mod optimization;
mod parsing;
mod prompts;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::parsing::{PdfTextExtractor, PdftoppmRasterizer, ResumeParser};
use crate::prompts::{PromptLoader, EXTRACTION, OPTIMIZATION};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ResumeForge API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(config.llm_client_config())?;
    info!(
        "LLM client initialized (parser: {}, optimizer: {}, max attempts: {})",
        config.parser_model, config.optimizer_model, config.llm_max_attempts
    );

    // Load prompt templates, with optional on-disk overrides
    let prompts_dir = config.prompts_dir.as_deref();
    if let Some(dir) = prompts_dir {
        info!("Prompt overrides enabled from {}", dir.display());
    }
    let extraction_prompts = Arc::new(PromptLoader::with_overrides(EXTRACTION, prompts_dir)?);
    let optimization_prompts = Arc::new(PromptLoader::with_overrides(OPTIMIZATION, prompts_dir)?);

    // Page rasterizer for vision parsing
    let rasterizer = Arc::new(PdftoppmRasterizer::new(
        config.pdftoppm_path.clone(),
        config.pdf_render_dpi,
    ));
    info!(
        "Rasterizer: {} at {} DPI",
        config.pdftoppm_path.display(),
        config.pdf_render_dpi
    );

    let provider = Arc::new(llm);
    let parser = ResumeParser::new(
        provider.clone(),
        extraction_prompts,
        rasterizer,
        Arc::new(PdfTextExtractor),
        config.parser_model.clone(),
    );

    // Build app state
    let state = AppState {
        provider,
        parser: Arc::new(parser),
        optimization_prompts,
        config: config.clone(),
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
