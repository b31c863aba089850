use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "goal_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    Active,
    Completed,
    Paused,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Goal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub target_date: NaiveDate,
    pub status: GoalStatus,
    pub created_at: DateTime<Utc>,
}

impl Goal {
    /// Overdue is a display property only; status never changes on its own.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status != GoalStatus::Completed && self.target_date < today
    }
}
