use std::fmt;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize, Serializer};
use sqlx::FromRow;
use uuid::Uuid;

/// Year-month bucket used for monthly progress, rendered as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn of(timestamp: DateTime<Utc>) -> Self {
        Self {
            year: timestamp.year(),
            month: timestamp.month(),
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A single logged piece of learning. Immutable apart from owner edits.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Milestone {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Weak reference: the goal may be deleted while the milestone stays.
    pub goal_id: Option<Uuid>,
    pub learning: String,
    pub source: String,
    pub hours: f64,
    pub can_teach: bool,
    pub link: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Milestone {
    /// Derived from `created_at` only, so editable fields cannot move a
    /// milestone into another month.
    pub fn month_key(&self) -> MonthKey {
        MonthKey::of(self.created_at)
    }
}
