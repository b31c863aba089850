use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use crate::badges::{generate_badge, list_badges};
use crate::errors::AppError;
use crate::models::artifact::{BadgeRequest, GeneratedArtifact};
use crate::routes::UserIdQuery;
use crate::state::AppState;

/// POST /api/v1/badges/generate
pub async fn handle_generate_badge(
    State(state): State<AppState>,
    Json(req): Json<BadgeRequest>,
) -> Result<(StatusCode, Json<GeneratedArtifact>), AppError> {
    let artifact = generate_badge(&state, &req).await?;
    Ok((StatusCode::CREATED, Json(artifact)))
}

/// GET /api/v1/badges
pub async fn handle_list_badges(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<GeneratedArtifact>>, AppError> {
    Ok(Json(list_badges(&state, params.user_id).await?))
}
