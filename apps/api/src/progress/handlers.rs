use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;

use crate::errors::AppError;
use crate::progress::{compute_progress, ProgressReport};
use crate::records::fetch_milestones;
use crate::routes::UserIdQuery;
use crate::state::AppState;

/// GET /api/v1/progress
/// Recomputed from the milestone history on every call.
pub async fn handle_get_progress(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ProgressReport>, AppError> {
    let milestones = fetch_milestones(&state.db, params.user_id).await?;
    Ok(Json(compute_progress(
        &milestones,
        Utc::now(),
        state.config.monthly_target_hours,
    )))
}
