//! Streak calculations over sets of completed dates

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Streak track: a single plan kind, or both on the same day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Track {
    Workout,
    Diet,
    Overall,
}

impl Track {
    pub fn as_str(&self) -> &'static str {
        match self {
            Track::Workout => "workout",
            Track::Diet => "diet",
            Track::Overall => "overall",
        }
    }
}

/// Current and longest streak for one track
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakSnapshot {
    pub current: u32,
    pub longest: u32,
}

impl StreakSnapshot {
    pub fn from_dates(dates: &BTreeSet<NaiveDate>, today: NaiveDate) -> Self {
        Self {
            current: current_streak(dates, today),
            longest: longest_streak(dates),
        }
    }
}

/// Streaks for every track
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackStreaks {
    pub workout: StreakSnapshot,
    pub diet: StreakSnapshot,
    pub overall: StreakSnapshot,
}

impl TrackStreaks {
    pub fn get(&self, track: Track) -> StreakSnapshot {
        match track {
            Track::Workout => self.workout,
            Track::Diet => self.diet,
            Track::Overall => self.overall,
        }
    }
}

/// Consecutive days ending at the most recent completed date.
///
/// The run only counts while it is still alive: the most recent date must be
/// today or yesterday, so a day that has not been marked yet does not break
/// the streak. Dates after `today` are ignored.
pub fn current_streak(dates: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let Some(&most_recent) = dates.range(..=today).next_back() else {
        return 0;
    };

    if (today - most_recent).num_days() > 1 {
        return 0;
    }

    let mut streak = 1;
    let mut cursor = most_recent.pred_opt();
    while let Some(date) = cursor.filter(|d| dates.contains(d)) {
        streak += 1;
        cursor = date.pred_opt();
    }

    streak
}

/// Longest run of consecutive calendar dates ever recorded
pub fn longest_streak(dates: &BTreeSet<NaiveDate>) -> u32 {
    if dates.is_empty() {
        return 0;
    }

    let mut longest = 1;
    let mut run = 1;
    let sorted: Vec<&NaiveDate> = dates.iter().collect();

    for pair in sorted.windows(2) {
        if (*pair[1] - *pair[0]).num_days() == 1 {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 1;
        }
    }

    longest
}
