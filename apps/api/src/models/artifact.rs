use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A generated badge + social post. Insert-only: every generation is a new row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GeneratedArtifact {
    pub id: Uuid,
    pub user_id: Uuid,
    pub employee_name: String,
    pub learning: String,
    pub difficulty: String,
    pub badge_text: String,
    pub post_text: String,
    /// `data:image/svg+xml;base64,…`
    pub badge_url: String,
    /// Set when the model ignored the section markers and a fallback was used.
    pub parse_degraded: bool,
    pub created_at: DateTime<Utc>,
}

/// Input to a badge/post generation.
#[derive(Debug, Clone, Deserialize)]
pub struct BadgeRequest {
    pub user_id: Uuid,
    pub employee_name: String,
    pub learning: String,
    pub difficulty: String,
}
