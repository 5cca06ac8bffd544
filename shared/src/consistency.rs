//! Weekly and monthly consistency figures

use crate::calendar::week_start_monday;
use crate::history::HistoryEntry;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Trailing window (in history entries) for monthly consistency
pub const MONTHLY_WINDOW_DAYS: usize = 30;

/// Done-day counts for the current calendar week (Monday through today)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklyConsistency {
    pub workout_days: u32,
    pub diet_days: u32,
    pub overall_days: u32,
    pub elapsed_days: u32,
    pub percentage: f64,
}

/// Overall consistency over the trailing monthly window
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyConsistency {
    pub overall_days: u32,
    pub window_days: u32,
    pub percentage: f64,
}

fn percent(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    let pct = f64::from(part) / f64::from(whole) * 100.0;
    (pct * 10.0).round() / 10.0
}

/// Consistency for the calendar week containing `today`.
///
/// Elapsed days always count from Monday, even when history starts later in
/// the week.
pub fn weekly_consistency(history: &[HistoryEntry], today: NaiveDate) -> WeeklyConsistency {
    let monday = week_start_monday(today);
    let elapsed_days = u32::try_from((today - monday).num_days() + 1).unwrap_or(0);

    let mut weekly = WeeklyConsistency {
        elapsed_days,
        ..Default::default()
    };

    for entry in history
        .iter()
        .filter(|e| e.date >= monday && e.date <= today)
    {
        weekly.workout_days += u32::from(entry.workout_done);
        weekly.diet_days += u32::from(entry.diet_done);
        weekly.overall_days += u32::from(entry.overall_done);
    }

    weekly.percentage = percent(weekly.overall_days, elapsed_days);
    weekly
}

/// Share of overall-done days among the last [`MONTHLY_WINDOW_DAYS`] entries
pub fn monthly_consistency(history: &[HistoryEntry]) -> MonthlyConsistency {
    let window = &history[history.len().saturating_sub(MONTHLY_WINDOW_DAYS)..];
    let window_days = u32::try_from(window.len()).unwrap_or(0);
    let overall_days = u32::try_from(window.iter().filter(|e| e.overall_done).count()).unwrap_or(0);

    MonthlyConsistency {
        overall_days,
        window_days,
        percentage: percent(overall_days, window_days),
    }
}
