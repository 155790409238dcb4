mod bank;
mod capabilities;
mod config;
mod errors;
mod interview;
mod llm_client;
mod models;
mod routes;
mod scoring;
mod selection;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::bank::QuestionBank;
use crate::capabilities::Capabilities;
use crate::config::Config;
use crate::interview::{InterviewSession, InterviewSettings};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting {} v{}", config.app_name, env!("CARGO_PKG_VERSION"));

    // Question bank is the one hard startup requirement
    let bank = QuestionBank::load(&config.question_bank_path)
        .with_context(|| format!("Failed to load question bank from {}", config.question_bank_path))?;

    let capabilities = build_capabilities(&config)?;

    let settings = InterviewSettings::from_config(&config);
    let session = InterviewSession::new(Arc::new(bank), capabilities, settings);
    info!(
        "Interview session ready: {} questions, mode {:?}",
        settings.num_questions,
        session.mode()
    );

    let state = AppState::new(session, config.clone());

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Wires the LLM-backed capabilities when an API key is configured.
fn build_capabilities(config: &Config) -> Result<Capabilities> {
    let Some(api_key) = config.anthropic_api_key.clone() else {
        warn!("ANTHROPIC_API_KEY not set; running with the question bank and keyword rubric only");
        return Ok(Capabilities::none());
    };
    let llm = LlmClient::new(api_key, config.llm_model.clone())
        .context("Failed to build LLM HTTP client")?;
    info!("LLM client initialized (model: {})", llm.model());
    Ok(Capabilities::from_llm(llm))
}
