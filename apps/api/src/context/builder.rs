//! Prompt Context Builder: a bounded, deterministic summary of one user.
//!
//! History grows without limit; the context never does. Every list is capped
//! by `ContextLimits` and ordered by a stable sort, so identical inputs always
//! produce an identical context (and identical prompt text).

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::context::peers::{rollup_peer_tags, PeerTag};
use crate::models::goal::{Goal, GoalStatus};
use crate::models::milestone::{Milestone, MonthKey};
use crate::models::profile::UserProfile;
use crate::progress::aggregator::{compute_progress, ProgressSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextLimits {
    pub recent_milestones: usize,
    pub active_goals: usize,
    pub peer_tags: usize,
}

impl Default for ContextLimits {
    fn default() -> Self {
        Self {
            recent_milestones: 5,
            active_goals: 3,
            peer_tags: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalSummary {
    pub title: String,
    pub description: String,
    pub target_date: NaiveDate,
    pub overdue: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MilestoneSummary {
    pub learning: String,
    pub source: String,
    pub hours: f64,
    pub can_teach: bool,
    pub month_key: MonthKey,
}

/// Everything the model is told about a user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptContext {
    pub full_name: String,
    pub position: String,
    pub department: String,
    pub skills: Vec<String>,
    pub interests: Vec<String>,
    pub active_goals: Vec<GoalSummary>,
    pub recent_milestones: Vec<MilestoneSummary>,
    pub peer_tags: Vec<PeerTag>,
    pub current_month: ProgressSnapshot,
}

impl PromptContext {
    /// Labels of the signals that are present, in a fixed order.
    pub fn personalization_factors(&self) -> Vec<String> {
        [
            ("skills", !self.skills.is_empty()),
            ("interests", !self.interests.is_empty()),
            ("goals", !self.active_goals.is_empty()),
            ("milestones", !self.recent_milestones.is_empty()),
            ("peers", !self.peer_tags.is_empty()),
        ]
        .into_iter()
        .filter(|(_, present)| *present)
        .map(|(label, _)| label.to_string())
        .collect()
    }
}

/// The records a context is built from, as read for one user.
#[derive(Debug, Clone, Copy)]
pub struct ContextSources<'a> {
    pub profile: &'a UserProfile,
    pub goals: &'a [Goal],
    pub milestones: &'a [Milestone],
    /// Interest lists of other users, identities already dropped.
    pub peer_interests: &'a [Vec<String>],
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PromptContextBuilder {
    limits: ContextLimits,
}

impl PromptContextBuilder {
    pub fn new(limits: ContextLimits) -> Self {
        Self { limits }
    }

    pub fn build(
        &self,
        sources: ContextSources<'_>,
        now: DateTime<Utc>,
        monthly_target_hours: f64,
    ) -> PromptContext {
        let today = now.date_naive();
        let profile = sources.profile;

        let mut goals: Vec<&Goal> = sources
            .goals
            .iter()
            .filter(|g| g.status == GoalStatus::Active)
            .collect();
        goals.sort_by_key(|g| g.target_date);
        let active_goals = goals
            .into_iter()
            .take(self.limits.active_goals)
            .map(|g| GoalSummary {
                title: g.title.clone(),
                description: g.description.clone(),
                target_date: g.target_date,
                overdue: g.is_overdue(today),
            })
            .collect();

        let mut milestones: Vec<&Milestone> = sources.milestones.iter().collect();
        milestones.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let recent_milestones = milestones
            .into_iter()
            .take(self.limits.recent_milestones)
            .map(|m| MilestoneSummary {
                learning: m.learning.clone(),
                source: m.source.clone(),
                hours: m.hours,
                can_teach: m.can_teach,
                month_key: m.month_key(),
            })
            .collect();

        let current_month = compute_progress(sources.milestones, now, monthly_target_hours).current;

        PromptContext {
            full_name: profile.full_name.clone(),
            position: profile.position.clone(),
            department: profile.department.clone(),
            skills: profile.skills.as_slice().to_vec(),
            interests: profile.learning_interests.as_slice().to_vec(),
            active_goals,
            recent_milestones,
            peer_tags: rollup_peer_tags(sources.peer_interests, self.limits.peer_tags),
            current_month,
        }
    }
}
