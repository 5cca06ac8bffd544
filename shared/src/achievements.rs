//! Achievements and milestones derived from streaks
//!
//! Achievements unlock once a track's *longest* streak reaches a threshold.
//! The first time an achievement unlocks is recorded in an
//! [`AchievementLedger`]; later evaluations reuse the recorded time, so the
//! unlock date shown to the user stays put.
//!
//! Milestones measure the *current* streak against fixed targets and can be
//! lost again when a streak breaks.

use crate::streaks::{Track, TrackStreaks};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Milestone targets for the workout and diet tracks
pub const SINGLE_TRACK_MILESTONES: [u32; 3] = [7, 14, 30];

/// Milestone targets for the combined track
pub const OVERALL_MILESTONES: [u32; 4] = [7, 21, 50, 100];

/// Static achievement definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AchievementDef {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub category: Track,
    /// Longest-streak length required to unlock
    pub threshold: u32,
}

/// Fixed achievement table
pub const ACHIEVEMENTS: &[AchievementDef] = &[
    AchievementDef {
        id: "workout_week_warrior",
        title: "Week Warrior",
        description: "Complete your workouts 7 days in a row",
        category: Track::Workout,
        threshold: 7,
    },
    AchievementDef {
        id: "workout_iron_habit",
        title: "Iron Habit",
        description: "Complete your workouts 30 days in a row",
        category: Track::Workout,
        threshold: 30,
    },
    AchievementDef {
        id: "diet_clean_week",
        title: "Clean Week",
        description: "Follow your meal plan 7 days in a row",
        category: Track::Diet,
        threshold: 7,
    },
    AchievementDef {
        id: "diet_fortnight",
        title: "Fortnight of Fuel",
        description: "Follow your meal plan 14 days in a row",
        category: Track::Diet,
        threshold: 14,
    },
    AchievementDef {
        id: "diet_nutrition_pro",
        title: "Nutrition Pro",
        description: "Follow your meal plan 30 days in a row",
        category: Track::Diet,
        threshold: 30,
    },
    AchievementDef {
        id: "overall_balanced_fortnight",
        title: "Balanced Fortnight",
        description: "Hit both workout and meal plan 14 days in a row",
        category: Track::Overall,
        threshold: 14,
    },
    AchievementDef {
        id: "overall_total_transformation",
        title: "Total Transformation",
        description: "Hit both workout and meal plan 50 days in a row",
        category: Track::Overall,
        threshold: 50,
    },
];

impl AchievementDef {
    /// Whether the longest streak on this achievement's track clears the threshold
    pub fn is_met(&self, streaks: &TrackStreaks) -> bool {
        streaks.get(self.category).longest >= self.threshold
    }
}

/// Achievement included in a progress summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockedAchievement {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: Track,
    pub threshold: u32,
    pub unlocked_at: DateTime<Utc>,
}

/// First-unlock time per achievement id, persisted per user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AchievementLedger {
    unlocked: BTreeMap<String, DateTime<Utc>>,
}

impl AchievementLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unlock time for `id`, recording `now` if this is the first unlock.
    /// Returns the time and whether the ledger changed.
    pub fn record(&mut self, id: &str, now: DateTime<Utc>) -> (DateTime<Utc>, bool) {
        if let Some(at) = self.unlocked.get(id) {
            return (*at, false);
        }
        self.unlocked.insert(id.to_string(), now);
        (now, true)
    }

    pub fn unlocked_at(&self, id: &str) -> Option<DateTime<Utc>> {
        self.unlocked.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.unlocked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.unlocked.is_empty()
    }
}

/// Evaluate the achievement table against the current streaks.
///
/// Returns every achievement whose predicate holds, with its first-unlock
/// time, and whether the ledger gained new entries.
pub fn unlock_achievements(
    streaks: &TrackStreaks,
    ledger: &mut AchievementLedger,
    now: DateTime<Utc>,
) -> (Vec<UnlockedAchievement>, bool) {
    let mut changed = false;
    let unlocked = ACHIEVEMENTS
        .iter()
        .filter(|def| def.is_met(streaks))
        .map(|def| {
            let (unlocked_at, is_new) = ledger.record(def.id, now);
            changed |= is_new;
            UnlockedAchievement {
                id: def.id.to_string(),
                title: def.title.to_string(),
                description: def.description.to_string(),
                category: def.category,
                threshold: def.threshold,
                unlocked_at,
            }
        })
        .collect();

    (unlocked, changed)
}

/// Progress towards a fixed current-streak target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub category: Track,
    pub target: u32,
    pub current: u32,
    pub achieved: bool,
    pub progress_percent: f64,
}

impl Milestone {
    fn new(category: Track, target: u32, current: u32) -> Self {
        let progress = (f64::from(current) / f64::from(target) * 100.0).min(100.0);
        Self {
            category,
            target,
            current,
            achieved: current >= target,
            progress_percent: (progress * 10.0).round() / 10.0,
        }
    }
}

/// Milestones for every track, measured against current streaks
pub fn milestones(streaks: &TrackStreaks) -> Vec<Milestone> {
    let single = [Track::Workout, Track::Diet].into_iter().flat_map(|track| {
        SINGLE_TRACK_MILESTONES
            .iter()
            .map(move |&target| Milestone::new(track, target, streaks.get(track).current))
    });
    let overall = OVERALL_MILESTONES
        .iter()
        .map(|&target| Milestone::new(Track::Overall, target, streaks.overall.current));

    single.chain(overall).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::streaks::StreakSnapshot;
    use chrono::{Duration, TimeZone};

    fn streaks(workout: (u32, u32), diet: (u32, u32), overall: (u32, u32)) -> TrackStreaks {
        let snap = |(current, longest)| StreakSnapshot { current, longest };
        TrackStreaks {
            workout: snap(workout),
            diet: snap(diet),
            overall: snap(overall),
        }
    }

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_no_streaks_no_achievements() {
        let mut ledger = AchievementLedger::new();
        let (unlocked, changed) = unlock_achievements(&TrackStreaks::default(), &mut ledger, at(1));
        assert!(unlocked.is_empty());
        assert!(!changed);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_thresholds_use_longest_streak() {
        let mut ledger = AchievementLedger::new();
        let s = streaks((0, 7), (2, 14), (0, 13));
        let (unlocked, changed) = unlock_achievements(&s, &mut ledger, at(1));

        let ids: Vec<&str> = unlocked.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["workout_week_warrior", "diet_clean_week", "diet_fortnight"]);
        assert!(changed);
        assert_eq!(ledger.len(), 3);
    }

    #[test]
    fn test_unlock_time_is_persisted_not_recomputed() {
        let mut ledger = AchievementLedger::new();
        let s = streaks((7, 7), (0, 0), (0, 0));

        let (first, _) = unlock_achievements(&s, &mut ledger, at(1));
        let (second, changed) = unlock_achievements(&s, &mut ledger, at(1) + Duration::days(5));

        assert!(!changed);
        assert_eq!(first[0].unlocked_at, at(1));
        assert_eq!(second[0].unlocked_at, at(1));
    }

    #[test]
    fn test_ledger_round_trips_as_map() {
        let mut ledger = AchievementLedger::new();
        ledger.record("diet_clean_week", at(3));
        let json = serde_json::to_string(&ledger).unwrap();
        assert!(json.starts_with("{\"diet_clean_week\":"));

        let back: AchievementLedger = serde_json::from_str(&json).unwrap();
        assert_eq!(back.unlocked_at("diet_clean_week"), Some(at(3)));
    }

    #[test]
    fn test_milestones_use_current_streak() {
        let s = streaks((10, 40), (0, 30), (21, 21));
        let all = milestones(&s);

        assert_eq!(all.len(), 10);

        let workout: Vec<_> = all.iter().filter(|m| m.category == Track::Workout).collect();
        assert_eq!(
            workout.iter().map(|m| m.achieved).collect::<Vec<_>>(),
            vec![true, false, false]
        );
        assert!((workout[1].progress_percent - 71.4).abs() < 1e-9);

        assert!(all
            .iter()
            .filter(|m| m.category == Track::Diet)
            .all(|m| !m.achieved && m.progress_percent == 0.0));

        let overall: Vec<_> = all.iter().filter(|m| m.category == Track::Overall).collect();
        assert_eq!(
            overall.iter().map(|m| m.target).collect::<Vec<_>>(),
            OVERALL_MILESTONES.to_vec()
        );
        assert!(overall[1].achieved);
        assert!(!overall[2].achieved);
    }
}
