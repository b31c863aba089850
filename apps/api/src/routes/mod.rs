pub mod health;

use axum::{
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::badges::handlers as badges;
use crate::progress::handlers as progress;
use crate::recommendations::handlers as recommendations;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/progress", get(progress::handle_get_progress))
        .route("/api/v1/badges", get(badges::handle_list_badges))
        .route("/api/v1/badges/generate", post(badges::handle_generate_badge))
        .route(
            "/api/v1/recommendations",
            get(recommendations::handle_get_recommendations),
        )
        .route(
            "/api/v1/recommendations/refresh",
            post(recommendations::handle_refresh_recommendations),
        )
        .with_state(state)
}
