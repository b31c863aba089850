//! Read access to the learning records owned by the CRUD side of the product
//! (profiles, goals, milestones) plus the insert-only artifact history.

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::artifact::GeneratedArtifact;
use crate::models::goal::Goal;
use crate::models::milestone::Milestone;
use crate::models::profile::{UserProfile, UserProfileRow};

const ARTIFACT_HISTORY_LIMIT: i64 = 100;

pub async fn fetch_profile(pool: &PgPool, user_id: Uuid) -> Result<Option<UserProfile>> {
    let row = sqlx::query_as::<_, UserProfileRow>(
        r#"
        SELECT user_id, full_name, position, department, join_date,
               skills, learning_interests
        FROM user_profiles
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(UserProfile::from))
}

/// Milestones in creation order, oldest first.
pub async fn fetch_milestones(pool: &PgPool, user_id: Uuid) -> Result<Vec<Milestone>> {
    Ok(sqlx::query_as::<_, Milestone>(
        r#"
        SELECT id, user_id, goal_id, learning, source, hours, can_teach, link, created_at
        FROM milestones
        WHERE user_id = $1
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}

pub async fn fetch_goals(pool: &PgPool, user_id: Uuid) -> Result<Vec<Goal>> {
    Ok(sqlx::query_as::<_, Goal>(
        r#"
        SELECT id, user_id, title, description, target_date, status, created_at
        FROM goals
        WHERE user_id = $1
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}

/// Learning-interest lists of up to `sample_size` other users, newest profiles
/// first. Identities are dropped here; callers only ever see the aggregated
/// label frequency.
pub async fn fetch_peer_interests(
    pool: &PgPool,
    user_id: Uuid,
    sample_size: i64,
) -> Result<Vec<Vec<String>>> {
    let rows: Vec<(Vec<String>,)> = sqlx::query_as(
        r#"
        SELECT learning_interests
        FROM user_profiles
        WHERE user_id <> $1
          AND cardinality(learning_interests) > 0
        ORDER BY created_at DESC, user_id
        LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(sample_size.max(0))
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|(labels,)| labels).collect())
}

pub async fn insert_artifact(pool: &PgPool, artifact: &GeneratedArtifact) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO generated_artifacts
            (id, user_id, employee_name, learning, difficulty, badge_text,
             post_text, badge_url, parse_degraded, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        "#,
    )
    .bind(artifact.id)
    .bind(artifact.user_id)
    .bind(&artifact.employee_name)
    .bind(&artifact.learning)
    .bind(&artifact.difficulty)
    .bind(&artifact.badge_text)
    .bind(&artifact.post_text)
    .bind(&artifact.badge_url)
    .bind(artifact.parse_degraded)
    .bind(artifact.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Newest first.
pub async fn list_artifacts(pool: &PgPool, user_id: Uuid) -> Result<Vec<GeneratedArtifact>> {
    Ok(sqlx::query_as::<_, GeneratedArtifact>(
        r#"
        SELECT id, user_id, employee_name, learning, difficulty, badge_text,
               post_text, badge_url, parse_degraded, created_at
        FROM generated_artifacts
        WHERE user_id = $1
        ORDER BY created_at DESC
        LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(ARTIFACT_HISTORY_LIMIT)
    .fetch_all(pool)
    .await?)
}
