//! Per-day history timeline for both tracks
//!
//! The history array is the common timeline that the combined ("overall")
//! streak and the consistency figures are computed from: one entry per
//! calendar day from the anchor date through today, ascending, with no gaps.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Trailing window used when no plan start date is known
pub const HISTORY_FALLBACK_DAYS: i64 = 90;

/// One day of the combined timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: NaiveDate,
    pub workout_done: bool,
    pub diet_done: bool,
    pub overall_done: bool,
}

/// First date of the history timeline.
///
/// The earlier of the two plan starts when both exist, whichever exists when
/// only one does, otherwise a trailing [`HISTORY_FALLBACK_DAYS`] window.
pub fn history_anchor(
    workout_start: Option<NaiveDate>,
    diet_start: Option<NaiveDate>,
    today: NaiveDate,
) -> NaiveDate {
    match (workout_start, diet_start) {
        (Some(w), Some(d)) => w.min(d),
        (Some(start), None) | (None, Some(start)) => start,
        (None, None) => today - Duration::days(HISTORY_FALLBACK_DAYS - 1),
    }
}

/// Build the day-by-day history from `anchor` through `today` inclusive
///
/// Returns an empty timeline when the anchor lies in the future.
pub fn build_history(
    workout_dates: &BTreeSet<NaiveDate>,
    diet_dates: &BTreeSet<NaiveDate>,
    anchor: NaiveDate,
    today: NaiveDate,
) -> Vec<HistoryEntry> {
    anchor
        .iter_days()
        .take_while(|date| *date <= today)
        .map(|date| {
            let workout_done = workout_dates.contains(&date);
            let diet_done = diet_dates.contains(&date);
            HistoryEntry {
                date,
                workout_done,
                diet_done,
                overall_done: workout_done && diet_done,
            }
        })
        .collect()
}

/// Dates of the history entries that satisfy `predicate`
pub fn dates_where<F>(history: &[HistoryEntry], predicate: F) -> BTreeSet<NaiveDate>
where
    F: Fn(&HistoryEntry) -> bool,
{
    history
        .iter()
        .filter(|entry| predicate(entry))
        .map(|entry| entry.date)
        .collect()
}
