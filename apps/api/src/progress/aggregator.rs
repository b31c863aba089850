//! Progress Aggregator: monthly and lifetime statistics over a user's milestones.
//!
//! Everything here is derived on request and never stored, so it cannot go stale.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::milestone::{Milestone, MonthKey};

/// Monthly learning target used when configuration does not override it.
pub const DEFAULT_MONTHLY_TARGET_HOURS: f64 = 6.0;

/// Statistics for one month-key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSnapshot {
    pub month_key: MonthKey,
    /// Uncapped sum of milestone hours.
    pub total_hours: f64,
    pub milestone_count: usize,
    pub can_teach_count: usize,
    /// `min(100, 100 * total_hours / target)`, never negative.
    pub target_progress: f64,
}

impl ProgressSnapshot {
    fn empty(month_key: MonthKey) -> Self {
        Self {
            month_key,
            total_hours: 0.0,
            milestone_count: 0,
            can_teach_count: 0,
            target_progress: 0.0,
        }
    }
}

/// All-time totals across every month.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LifetimeTotals {
    pub total_hours: f64,
    pub milestone_count: usize,
    pub can_teach_count: usize,
    pub active_months: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressReport {
    pub by_month: BTreeMap<MonthKey, ProgressSnapshot>,
    /// Snapshot for the month containing `now`; all zeros when nothing was logged.
    pub current: ProgressSnapshot,
    pub lifetime: LifetimeTotals,
    pub monthly_target_hours: f64,
}

/// Groups milestones by the month of their creation time and computes
/// per-month statistics plus the snapshot for the month containing `now`.
///
/// Never fails: an empty history yields an all-zero current snapshot.
pub fn compute_progress(
    milestones: &[Milestone],
    now: DateTime<Utc>,
    monthly_target_hours: f64,
) -> ProgressReport {
    let mut by_month: BTreeMap<MonthKey, ProgressSnapshot> = BTreeMap::new();

    for milestone in milestones {
        let key = milestone.month_key();
        let snapshot = by_month
            .entry(key)
            .or_insert_with(|| ProgressSnapshot::empty(key));
        snapshot.total_hours += milestone.hours;
        snapshot.milestone_count += 1;
        if milestone.can_teach {
            snapshot.can_teach_count += 1;
        }
    }

    for snapshot in by_month.values_mut() {
        snapshot.target_progress = target_progress(snapshot.total_hours, monthly_target_hours);
    }

    let lifetime = LifetimeTotals {
        total_hours: by_month.values().map(|s| s.total_hours).sum(),
        milestone_count: milestones.len(),
        can_teach_count: milestones.iter().filter(|m| m.can_teach).count(),
        active_months: by_month.len(),
    };

    let current_key = MonthKey::of(now);
    let current = by_month
        .get(&current_key)
        .cloned()
        .unwrap_or_else(|| ProgressSnapshot::empty(current_key));

    ProgressReport {
        by_month,
        current,
        lifetime,
        monthly_target_hours,
    }
}

/// Percentage of the monthly target reached, clamped to 0 – 100.
/// A non-positive target reports 0 rather than dividing by it.
pub fn target_progress(total_hours: f64, monthly_target_hours: f64) -> f64 {
    if monthly_target_hours <= 0.0 || !total_hours.is_finite() {
        return 0.0;
    }
    (100.0 * total_hours / monthly_target_hours).clamp(0.0, 100.0)
}
