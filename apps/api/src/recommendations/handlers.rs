use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::recommendation::RecommendationSet;
use crate::recommendations::{get_recommendations, refresh_recommendations, RecommendationLookup};
use crate::routes::UserIdQuery;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub user_id: Uuid,
}

/// GET /api/v1/recommendations
pub async fn handle_get_recommendations(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<RecommendationLookup>, AppError> {
    Ok(Json(get_recommendations(&state, params.user_id).await?))
}

/// POST /api/v1/recommendations/refresh
pub async fn handle_refresh_recommendations(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<RecommendationSet>, AppError> {
    Ok(Json(refresh_recommendations(&state, req.user_id).await?))
}
