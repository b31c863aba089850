use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

/// A single course/resource suggestion.
///
/// `price` is only ever set when `paid` is true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationItem {
    pub title: String,
    pub platform: String,
    pub difficulty: Difficulty,
    pub estimated_hours: f64,
    pub paid: bool,
    pub price: Option<String>,
    pub skill_tags: Vec<String>,
    pub reason: String,
    pub url: String,
    /// Always within 0.0 – 1.0.
    pub relevance_score: f64,
}

/// The current recommendations for one user. Replaced wholesale on refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationSet {
    pub user_id: Uuid,
    pub items: Vec<RecommendationItem>,
    pub personalization_factors: Vec<String>,
    pub total_count: usize,
    pub generated_at: DateTime<Utc>,
}

impl RecommendationSet {
    pub fn new(
        user_id: Uuid,
        items: Vec<RecommendationItem>,
        personalization_factors: Vec<String>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            total_count: items.len(),
            items,
            personalization_factors,
            generated_at,
        }
    }

    pub fn paid(&self) -> impl Iterator<Item = &RecommendationItem> {
        self.items.iter().filter(|i| i.paid)
    }

    pub fn unpaid(&self) -> impl Iterator<Item = &RecommendationItem> {
        self.items.iter().filter(|i| !i.paid)
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct RecommendationSetRow {
    pub user_id: Uuid,
    pub items: Json<Vec<RecommendationItem>>,
    pub personalization_factors: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

impl From<RecommendationSetRow> for RecommendationSet {
    fn from(row: RecommendationSetRow) -> Self {
        let items = row.items.0;
        Self {
            user_id: row.user_id,
            total_count: items.len(),
            items,
            personalization_factors: row.personalization_factors,
            generated_at: row.generated_at,
        }
    }
}
