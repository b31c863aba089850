//! Recommendation refresh: context → generation → parse → rank → replace.
//!
//! Every step runs before the store is touched, so a failure anywhere leaves the
//! previous set in place.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::context::prompts::render_recommendation_prompt;
use crate::context::{ContextSources, PromptContextBuilder};
use crate::errors::AppError;
use crate::llm_client::{GenerationMode, TextGenerator};
use crate::models::recommendation::RecommendationSet;
use crate::parsing::recommendations::RecommendationParser;
use crate::recommendations::ranker::rank_recommendations;
use crate::recommendations::store::RecommendationStore;

#[derive(Debug, Clone)]
pub struct RecommendationPipeline {
    builder: PromptContextBuilder,
    parser: RecommendationParser,
    monthly_target_hours: f64,
}

impl RecommendationPipeline {
    pub fn new(
        builder: PromptContextBuilder,
        parser: RecommendationParser,
        monthly_target_hours: f64,
    ) -> Self {
        Self {
            builder,
            parser,
            monthly_target_hours,
        }
    }

    /// Regenerates the user's set from scratch and replaces the stored one.
    /// Nothing from the previous set is merged in.
    pub async fn refresh(
        &self,
        store: &dyn RecommendationStore,
        llm: &dyn TextGenerator,
        sources: ContextSources<'_>,
        now: DateTime<Utc>,
    ) -> Result<RecommendationSet, AppError> {
        let user_id: Uuid = sources.profile.user_id;

        let ctx = self.builder.build(sources, now, self.monthly_target_hours);
        let prompt = render_recommendation_prompt(&ctx);
        debug!(%user_id, prompt_chars = prompt.len(), "Rendered recommendation prompt");

        let raw = llm
            .generate(&prompt, GenerationMode::RecommendationList)
            .await?;

        let outcome = self.parser.parse(&raw);
        if let Some(reason) = outcome.degrade_reason() {
            warn!(%user_id, ?reason, "Recommendation response parsed in degraded mode");
        }
        let batch = outcome.into_value();
        for rejected in &batch.rejected {
            warn!(
                %user_id,
                block = rejected.index,
                missing = ?rejected.missing,
                "Dropped recommendation block missing required fields"
            );
        }

        let items = rank_recommendations(batch.items);
        if items.is_empty() {
            return Err(AppError::UnusableResponse(format!(
                "no recommendations survived parsing ({} blocks rejected)",
                batch.rejected.len()
            )));
        }

        let set = RecommendationSet::new(user_id, items, ctx.personalization_factors(), now);
        store.replace(&set).await?;

        info!(
            "Refreshed recommendations for user {user_id}: {} unpaid, {} paid, {} rejected",
            set.unpaid().count(),
            set.paid().count(),
            batch.rejected.len()
        );
        Ok(set)
    }
}

impl Default for RecommendationPipeline {
    fn default() -> Self {
        Self::new(
            PromptContextBuilder::default(),
            RecommendationParser::default(),
            crate::progress::aggregator::DEFAULT_MONTHLY_TARGET_HOURS,
        )
    }
}
