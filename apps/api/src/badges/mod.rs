//! Achievement badges and social posts generated from a completed learning.

pub mod generator;
pub mod handlers;
pub mod render;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::context::{ContextSources, PromptContextBuilder};
use crate::errors::AppError;
use crate::models::artifact::{BadgeRequest, GeneratedArtifact};
use crate::records;
use crate::state::AppState;

/// Builds the user's context, generates an artifact and appends it to the
/// history. The artifact is stored only after generation succeeded.
pub async fn generate_badge(
    state: &AppState,
    request: &BadgeRequest,
) -> Result<GeneratedArtifact, AppError> {
    generator::validate_request(request)?;

    let user_id = request.user_id;
    let profile = records::fetch_profile(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No profile for user {user_id}")))?;
    let goals = records::fetch_goals(&state.db, user_id).await?;
    let milestones = records::fetch_milestones(&state.db, user_id).await?;

    let now = Utc::now();
    let ctx = PromptContextBuilder::default().build(
        ContextSources {
            profile: &profile,
            goals: &goals,
            milestones: &milestones,
            peer_interests: &[],
        },
        now,
        state.config.monthly_target_hours,
    );

    let artifact = generator::generate_artifact(state.llm.as_ref(), &ctx, request, now).await?;
    records::insert_artifact(&state.db, &artifact).await?;

    info!(
        "Generated badge {} for user {user_id} (degraded: {})",
        artifact.id, artifact.parse_degraded
    );
    Ok(artifact)
}

pub async fn list_badges(
    state: &AppState,
    user_id: Uuid,
) -> Result<Vec<GeneratedArtifact>, AppError> {
    Ok(records::list_artifacts(&state.db, user_id).await?)
}
