use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An ordered set of free-text labels (skills, interests).
///
/// Labels keep the spelling they were first added with; duplicates are
/// detected case-insensitively and dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct LabelSet(Vec<String>);

impl LabelSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a label unless an equal one (ignoring case) is already present.
    /// Blank labels are ignored. Returns whether the label was added.
    pub fn insert(&mut self, label: &str) -> bool {
        let label = label.trim();
        if label.is_empty() || self.contains(label) {
            return false;
        }
        self.0.push(label.to_string());
        true
    }

    pub fn contains(&self, label: &str) -> bool {
        let needle = label.trim().to_lowercase();
        self.0.iter().any(|l| l.to_lowercase() == needle)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for LabelSet {
    fn from(labels: Vec<String>) -> Self {
        labels.iter().map(String::as_str).collect()
    }
}

impl From<LabelSet> for Vec<String> {
    fn from(set: LabelSet) -> Self {
        set.0
    }
}

impl<'a> FromIterator<&'a str> for LabelSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = LabelSet::new();
        for label in iter {
            set.insert(label);
        }
        set
    }
}

/// An employee's learning profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: Uuid,
    pub full_name: String,
    pub position: String,
    pub department: String,
    pub join_date: NaiveDate,
    pub skills: LabelSet,
    pub learning_interests: LabelSet,
}

impl UserProfile {
    /// A profile is complete once both label sets carry at least one label.
    pub fn is_complete(&self) -> bool {
        !self.skills.is_empty() && !self.learning_interests.is_empty()
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct UserProfileRow {
    pub user_id: Uuid,
    pub full_name: String,
    pub position: String,
    pub department: String,
    pub join_date: NaiveDate,
    pub skills: Vec<String>,
    pub learning_interests: Vec<String>,
}

impl From<UserProfileRow> for UserProfile {
    fn from(row: UserProfileRow) -> Self {
        Self {
            user_id: row.user_id,
            full_name: row.full_name,
            position: row.position,
            department: row.department,
            join_date: row.join_date,
            skills: row.skills.into(),
            learning_interests: row.learning_interests.into(),
        }
    }
}
