//! Progress summary assembly
//!
//! Runs the whole pipeline over an immutable snapshot of plans and completion
//! logs: completed-dates projection → history → streaks → consistency →
//! achievements and milestones. Nothing here is cached; callers re-read the
//! logs before each call so the summary always reflects the stored log.

use crate::achievements::{milestones, unlock_achievements, AchievementLedger, Milestone, UnlockedAchievement};
use crate::completion::CompletionLog;
use crate::consistency::{monthly_consistency, weekly_consistency, MonthlyConsistency, WeeklyConsistency};
use crate::day_status::{completed_dates, week_view, WeekView};
use crate::history::{build_history, dates_where, history_anchor, HistoryEntry};
use crate::plan::Plan;
use crate::streaks::{StreakSnapshot, TrackStreaks};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Snapshot of everything the engine reads for one user
#[derive(Debug, Clone, Default)]
pub struct ProgressInputs {
    pub workout_plan: Option<Plan>,
    pub diet_plan: Option<Plan>,
    pub workout_log: CompletionLog,
    pub diet_log: CompletionLog,
}

/// Display-ready progress summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub today: NaiveDate,
    pub streaks: TrackStreaks,
    pub weekly: WeeklyConsistency,
    pub monthly: MonthlyConsistency,
    pub achievements: Vec<UnlockedAchievement>,
    pub milestones: Vec<Milestone>,
    pub history: Vec<HistoryEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workout_week: Option<WeekView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diet_week: Option<WeekView>,
}

impl ProgressSummary {
    /// Zero state: no streaks, no history, no achievements
    pub fn empty(today: NaiveDate) -> Self {
        let streaks = TrackStreaks::default();
        Self {
            today,
            streaks,
            weekly: weekly_consistency(&[], today),
            monthly: MonthlyConsistency::default(),
            achievements: Vec::new(),
            milestones: milestones(&streaks),
            history: Vec::new(),
            workout_week: None,
            diet_week: None,
        }
    }
}

/// Result of a progress computation
#[derive(Debug, Clone)]
pub struct ProgressOutcome {
    pub summary: ProgressSummary,
    /// Whether the achievement ledger gained entries and should be persisted
    pub ledger_changed: bool,
}

fn track_dates(plan: Option<&Plan>, log: &CompletionLog, today: NaiveDate) -> BTreeSet<NaiveDate> {
    plan.map(|p| completed_dates(p, log, today)).unwrap_or_default()
}

/// Compute the full progress summary for one user
pub fn compute_progress(
    inputs: &ProgressInputs,
    ledger: &mut AchievementLedger,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> ProgressOutcome {
    let workout_plan = inputs.workout_plan.as_ref();
    let diet_plan = inputs.diet_plan.as_ref();

    let workout_dates = track_dates(workout_plan, &inputs.workout_log, today);
    let diet_dates = track_dates(diet_plan, &inputs.diet_log, today);

    let anchor = history_anchor(
        workout_plan.map(|p| p.start_date),
        diet_plan.map(|p| p.start_date),
        today,
    );
    let history = build_history(&workout_dates, &diet_dates, anchor, today);
    let overall_dates = dates_where(&history, |entry| entry.overall_done);

    let streaks = TrackStreaks {
        workout: StreakSnapshot::from_dates(&workout_dates, today),
        diet: StreakSnapshot::from_dates(&diet_dates, today),
        overall: StreakSnapshot::from_dates(&overall_dates, today),
    };

    let (achievements, ledger_changed) = unlock_achievements(&streaks, ledger, now);

    let summary = ProgressSummary {
        today,
        streaks,
        weekly: weekly_consistency(&history, today),
        monthly: monthly_consistency(&history),
        achievements,
        milestones: milestones(&streaks),
        workout_week: workout_plan.map(|p| week_view(p, &inputs.workout_log, today)),
        diet_week: diet_plan.map(|p| week_view(p, &inputs.diet_log, today)),
        history,
    };

    ProgressOutcome {
        summary,
        ledger_changed,
    }
}
