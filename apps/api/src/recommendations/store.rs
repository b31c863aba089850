use async_trait::async_trait;
use serde::Serialize;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::recommendation::{RecommendationSet, RecommendationSetRow};

/// Result of looking up a user's current recommendations.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecommendationLookup {
    Ready(RecommendationSet),
    NotGenerated,
}

/// Holds the current recommendation set per user.
///
/// `replace` overwrites in a single write. Concurrent refreshes for the same
/// user are not serialized: the last write wins.
#[async_trait]
pub trait RecommendationStore: Send + Sync {
    async fn get(&self, user_id: Uuid) -> Result<RecommendationLookup, AppError>;

    async fn replace(&self, set: &RecommendationSet) -> Result<(), AppError>;
}

// ---------------------------------------------------------------------------
// PostgreSQL
// ---------------------------------------------------------------------------

pub struct PgRecommendationStore {
    pool: PgPool,
}

impl PgRecommendationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecommendationStore for PgRecommendationStore {
    async fn get(&self, user_id: Uuid) -> Result<RecommendationLookup, AppError> {
        let row = sqlx::query_as::<_, RecommendationSetRow>(
            r#"
            SELECT user_id, items, personalization_factors, generated_at
            FROM recommendation_sets
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(match row {
            Some(row) => RecommendationLookup::Ready(row.into()),
            None => RecommendationLookup::NotGenerated,
        })
    }

    async fn replace(&self, set: &RecommendationSet) -> Result<(), AppError> {
        let total_count = i32::try_from(set.items.len()).unwrap_or(i32::MAX);

        sqlx::query(
            r#"
            INSERT INTO recommendation_sets
                (user_id, items, personalization_factors, total_count, generated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id) DO UPDATE SET
                items = EXCLUDED.items,
                personalization_factors = EXCLUDED.personalization_factors,
                total_count = EXCLUDED.total_count,
                generated_at = EXCLUDED.generated_at
            "#,
        )
        .bind(set.user_id)
        .bind(Json(&set.items))
        .bind(&set.personalization_factors)
        .bind(total_count)
        .bind(set.generated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

#[cfg(test)]
pub use memory::MemoryRecommendationStore;
