//! Personalized course recommendations: one current set per user, replaced
//! wholesale on every refresh.

pub mod handlers;
pub mod ranker;
pub mod refresh;
pub mod store;

use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use crate::context::ContextSources;
use crate::errors::AppError;
use crate::models::recommendation::RecommendationSet;
use crate::records;
use crate::state::AppState;

pub use refresh::RecommendationPipeline;
#[cfg(test)]
pub use store::MemoryRecommendationStore;
pub use store::{PgRecommendationStore, RecommendationLookup, RecommendationStore};

pub async fn get_recommendations(
    state: &AppState,
    user_id: Uuid,
) -> Result<RecommendationLookup, AppError> {
    state.recommendations.get(user_id).await
}

/// Loads the user's records and runs a full refresh against them.
pub async fn refresh_recommendations(
    state: &AppState,
    user_id: Uuid,
) -> Result<RecommendationSet, AppError> {
    let profile = records::fetch_profile(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No profile for user {user_id}")))?;
    if !profile.is_complete() {
        warn!("Profile for user {user_id} has no skills or no interests; recommendations will be generic");
    }
    let goals = records::fetch_goals(&state.db, user_id).await?;
    let milestones = records::fetch_milestones(&state.db, user_id).await?;
    let peer_interests =
        records::fetch_peer_interests(&state.db, user_id, state.config.peer_sample_size).await?;

    state
        .pipeline
        .refresh(
            state.recommendations.as_ref(),
            state.llm.as_ref(),
            ContextSources {
                profile: &profile,
                goals: &goals,
                milestones: &milestones,
                peer_interests: &peer_interests,
            },
            Utc::now(),
        )
        .await
}
