//! Structured weekly plan model
//!
//! A plan is a 7-day template repeated over `total_weeks` weeks starting at
//! `start_date`. Workout and diet plans share the same shape but index their
//! weekly template with different weekday conventions:
//!
//! - Workout plans: Monday = 0 … Sunday = 6
//! - Diet plans: Sunday = 0 … Saturday = 6
//!
//! Stored completion history depends on both conventions, so they are kept as
//! two separate functions ([`workout_index_for`] and [`diet_index_for`]).

use crate::errors::PlanError;
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of template days in a plan week
pub const DAYS_PER_WEEK: usize = 7;

/// Which track a plan belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanKind {
    Workout,
    Diet,
}

impl PlanKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanKind::Workout => "workout",
            PlanKind::Diet => "diet",
        }
    }
}

impl fmt::Display for PlanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanKind {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "workout" | "workouts" => Ok(PlanKind::Workout),
            "diet" | "meal" | "meals" => Ok(PlanKind::Diet),
            other => Err(PlanError::UnknownKind(other.to_string())),
        }
    }
}

/// Meal slot within a diet day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().trim_end_matches('s') {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            "snack" => Ok(MealType::Snack),
            other => Err(PlanError::Validation(format!("Unknown meal type: {}", other))),
        }
    }
}

/// A single trackable entry in a day: an exercise or a meal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanItem {
    Exercise {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sets: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reps: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        notes: Option<String>,
    },
    Meal {
        meal_type: MealType,
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        calories: Option<u32>,
    },
}

impl PlanItem {
    /// Exercise with only a name
    pub fn exercise(name: impl Into<String>) -> Self {
        PlanItem::Exercise {
            name: name.into(),
            sets: None,
            reps: None,
            notes: None,
        }
    }

    /// Meal with no calorie estimate
    pub fn meal(meal_type: MealType, name: impl Into<String>) -> Self {
        PlanItem::Meal {
            meal_type,
            name: name.into(),
            calories: None,
        }
    }

    /// Display name of the exercise or meal
    pub fn name(&self) -> &str {
        match self {
            PlanItem::Exercise { name, .. } | PlanItem::Meal { name, .. } => name,
        }
    }

    /// Same item under a different display name
    pub fn renamed(mut self, new_name: impl Into<String>) -> Self {
        match &mut self {
            PlanItem::Exercise { name, .. } | PlanItem::Meal { name, .. } => *name = new_name.into(),
        }
        self
    }

    /// Identifier used in completion keys.
    ///
    /// Exercises use their name; meals use `{mealType}-{mealName}`.
    pub fn identifier(&self) -> String {
        match self {
            PlanItem::Exercise { name, .. } => name.clone(),
            PlanItem::Meal {
                meal_type, name, ..
            } => format!("{}-{}", meal_type, name),
        }
    }
}

/// One day of the weekly template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTemplate {
    pub day_name: String,
    pub is_rest_day: bool,
    #[serde(default)]
    pub items: Vec<PlanItem>,
}

impl DayTemplate {
    pub fn rest(day_name: impl Into<String>) -> Self {
        Self {
            day_name: day_name.into(),
            is_rest_day: true,
            items: Vec::new(),
        }
    }

    pub fn active(day_name: impl Into<String>, items: Vec<PlanItem>) -> Self {
        Self {
            day_name: day_name.into(),
            is_rest_day: false,
            items,
        }
    }
}

/// Structured multi-week plan (workout or diet)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub kind: PlanKind,
    pub goal: String,
    pub start_date: NaiveDate,
    pub total_weeks: u32,
    pub weekly_template: [DayTemplate; DAYS_PER_WEEK],
}

impl Plan {
    /// First date after the plan's active span
    ///
    /// Saturates at [`NaiveDate::MAX`] instead of overflowing.
    pub fn end_date(&self) -> NaiveDate {
        self.start_date
            .checked_add_signed(Duration::days(i64::from(self.total_weeks.max(1)) * 7))
            .unwrap_or(NaiveDate::MAX)
    }

    /// Whether `date` falls within `[start_date, end_date)`
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date < self.end_date()
    }

    /// Template slot for a calendar date, using this plan's weekday convention
    pub fn template_index_for(&self, date: NaiveDate) -> usize {
        match self.kind {
            PlanKind::Workout => workout_index_for(date),
            PlanKind::Diet => diet_index_for(date),
        }
    }

    /// Template that applies on a calendar date
    pub fn template_for(&self, date: NaiveDate) -> &DayTemplate {
        &self.weekly_template[self.template_index_for(date)]
    }
}

/// Workout template index: Monday = 0 … Sunday = 6
pub fn workout_index_for(date: NaiveDate) -> usize {
    date.weekday().num_days_from_monday() as usize
}

/// Diet template index: Sunday = 0 … Saturday = 6
pub fn diet_index_for(date: NaiveDate) -> usize {
    date.weekday().num_days_from_sunday() as usize
}

/// Weekday names in template order for a plan kind
pub fn template_day_names(kind: PlanKind) -> [&'static str; DAYS_PER_WEEK] {
    match kind {
        PlanKind::Workout => [
            "Monday",
            "Tuesday",
            "Wednesday",
            "Thursday",
            "Friday",
            "Saturday",
            "Sunday",
        ],
        PlanKind::Diet => [
            "Sunday",
            "Monday",
            "Tuesday",
            "Wednesday",
            "Thursday",
            "Friday",
            "Saturday",
        ],
    }
}
