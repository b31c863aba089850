use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::llm_client::TextGenerator;
use crate::recommendations::{RecommendationPipeline, RecommendationStore};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Text-generation backend. `LlmClient` in production, fakes in tests.
    pub llm: Arc<dyn TextGenerator>,
    pub recommendations: Arc<dyn RecommendationStore>,
    pub pipeline: Arc<RecommendationPipeline>,
    pub config: Config,
}
