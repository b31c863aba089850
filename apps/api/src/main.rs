mod badges;
mod config;
mod context;
mod db;
mod errors;
mod llm_client;
mod models;
mod parsing;
mod progress;
mod recommendations;
mod records;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::context::{ContextLimits, PromptContextBuilder};
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::parsing::recommendations::RecommendationParser;
use crate::recommendations::{PgRecommendationStore, RecommendationPipeline};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Learnboard API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize LLM client
    let llm = LlmClient::new(
        config.gemini_api_key.clone(),
        config.gemini_api_url.clone(),
        Duration::from_secs(config.llm_timeout_secs),
    )?;
    info!(
        "LLM client initialized (model: {}, timeout: {}s)",
        llm_client::MODEL,
        config.llm_timeout_secs
    );

    let pipeline = RecommendationPipeline::new(
        PromptContextBuilder::new(ContextLimits::default()),
        RecommendationParser::new(config.field_schema()),
        config.monthly_target_hours,
    );

    // Build app state
    let state = AppState {
        recommendations: Arc::new(PgRecommendationStore::new(db.clone())),
        db,
        llm: Arc::new(llm),
        pipeline: Arc::new(pipeline),
        config: config.clone(),
    };

    // Dropping a timed-out request cancels the generation call before any write.
    let app = build_router(state)
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
