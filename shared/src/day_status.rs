//! Day status classification
//!
//! A dated plan day is classified against the completion log and the current
//! date. The rules are applied in strict precedence order:
//!
//! 1. Rest days are always `Rest` at 100%
//! 2. Dates already in the completed-dates projection are `Completed`
//! 3. Today is `InProgress`, never `Missed`
//! 4. Dates before the plan start are `Upcoming`
//! 5. Past plan dates are `Completed` at or above the threshold, else `Missed`
//! 6. Future dates are `Upcoming`

use crate::calendar::{current_week_number, project_week, DatedDayInstance};
use crate::completion::CompletionLog;
use crate::plan::{Plan, PlanKind};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Share of a day's items that must be done for the day to count as completed.
/// Applies to workout exercises and diet meals alike.
pub const COMPLETION_THRESHOLD_PERCENT: u32 = 50;

/// Derived status of a plan day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    Rest,
    Upcoming,
    InProgress,
    Completed,
    Missed,
}

/// Classification result for one dated day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayProgress {
    pub date: NaiveDate,
    pub day_number: u32,
    pub status: DayStatus,
    pub percentage: u32,
    pub completed_items: usize,
    pub total_items: usize,
}

/// Current-week calendar view for one track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekView {
    pub kind: PlanKind,
    pub week_number: u32,
    pub total_weeks: u32,
    pub days: Vec<DayProgress>,
}

/// Integer completion percentage (floor); 0 when there are no items
pub fn completion_percentage(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let pct = completed.min(total) * 100 / total;
    u32::try_from(pct).unwrap_or(100)
}

/// Whether a completed/total ratio clears [`COMPLETION_THRESHOLD_PERCENT`]
pub fn meets_threshold(completed: usize, total: usize) -> bool {
    completion_percentage(completed, total) >= COMPLETION_THRESHOLD_PERCENT
}

/// Whether the plan day on `date` cleared the completion threshold.
///
/// Only active days can: a rest day has nothing to complete, so it is shown
/// as `Rest` by [`classify`] but never feeds streaks or history.
pub fn is_day_done(plan: &Plan, log: &CompletionLog, date: NaiveDate) -> bool {
    let template = plan.template_for(date);
    if template.is_rest_day {
        return false;
    }
    let done = log.completed_items(date, &template.items);
    meets_threshold(done, template.items.len())
}

/// Completed-dates projection for one track, from the plan start through today
pub fn completed_dates(plan: &Plan, log: &CompletionLog, today: NaiveDate) -> BTreeSet<NaiveDate> {
    let last = today.succ_opt().unwrap_or(today).min(plan.end_date());
    let mut dates = BTreeSet::new();

    let mut date = plan.start_date;
    while date < last {
        if is_day_done(plan, log, date) {
            dates.insert(date);
        }
        date += Duration::days(1);
    }

    dates
}

/// Classify a dated day
pub fn classify(
    day: &DatedDayInstance,
    plan_start: NaiveDate,
    completed: &BTreeSet<NaiveDate>,
    log: &CompletionLog,
    today: NaiveDate,
) -> DayProgress {
    let total_items = day.items.len();
    let progress = |status: DayStatus, percentage: u32, completed_items: usize| DayProgress {
        date: day.date,
        day_number: day.day_number,
        status,
        percentage,
        completed_items,
        total_items,
    };

    if day.is_rest_day {
        return progress(DayStatus::Rest, 100, 0);
    }

    let done = log.completed_items(day.date, &day.items);
    let percentage = completion_percentage(done, total_items);

    if completed.contains(&day.date) {
        return progress(DayStatus::Completed, percentage, done);
    }
    if day.date == today {
        return progress(DayStatus::InProgress, percentage, done);
    }
    if day.date < plan_start {
        return progress(DayStatus::Upcoming, 0, 0);
    }
    if day.date < today {
        let status = if percentage >= COMPLETION_THRESHOLD_PERCENT {
            DayStatus::Completed
        } else {
            DayStatus::Missed
        };
        return progress(status, percentage, done);
    }

    progress(DayStatus::Upcoming, 0, 0)
}

/// Project and classify the current plan week
pub fn week_view(plan: &Plan, log: &CompletionLog, today: NaiveDate) -> WeekView {
    let completed = completed_dates(plan, log, today);
    let days = project_week(plan, today)
        .iter()
        .map(|day| classify(day, plan.start_date, &completed, log, today))
        .collect();

    WeekView {
        kind: plan.kind,
        week_number: current_week_number(plan, today),
        total_weeks: plan.total_weeks,
        days,
    }
}
