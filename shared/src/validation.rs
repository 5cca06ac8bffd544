//! Input validation functions
//!
//! This module provides validation utilities for plan imports and completion
//! records. Request types in [`crate::types`] also derive `validator::Validate`.

use crate::plan::{Plan, PlanItem, PlanKind};
use chrono::{Duration, NaiveDate};
use std::collections::HashSet;

/// Longest plan goal accepted
pub const MAX_GOAL_LEN: usize = 200;

/// Longest item identifier accepted in a completion key
pub const MAX_ITEM_IDENTIFIER_LEN: usize = 200;

/// Longest user id accepted for key namespacing
pub const MAX_USER_ID_LEN: usize = 128;

/// How far (in days, roughly five years) a plan start may lie from today
pub const MAX_START_DATE_OFFSET_DAYS: i64 = 5 * 366;

/// Validate a structured plan before it is stored or aggregated
pub fn validate_plan(plan: &Plan, today: NaiveDate) -> Result<(), String> {
    validate_start_date(plan.start_date, today)?;
    if plan.total_weeks < 1 {
        return Err("Plan must span at least 1 week".to_string());
    }
    if plan.total_weeks > crate::parser::MAX_TOTAL_WEEKS {
        return Err(format!(
            "Plan cannot span more than {} weeks",
            crate::parser::MAX_TOTAL_WEEKS
        ));
    }
    if plan.goal.len() > MAX_GOAL_LEN {
        return Err("Goal too long".to_string());
    }

    for day in &plan.weekly_template {
        let mut seen = HashSet::new();
        for item in &day.items {
            validate_item_kind(plan.kind, item)?;
            let identifier = item.identifier();
            validate_item_identifier(&identifier)?;
            if !seen.insert(identifier) {
                return Err(format!("{} lists '{}' more than once", day.day_name, item.name()));
            }
        }
    }

    Ok(())
}

/// Plan start dates must lie within [`MAX_START_DATE_OFFSET_DAYS`] of today
pub fn validate_start_date(start: NaiveDate, today: NaiveDate) -> Result<(), String> {
    let offset = (start - today).num_days();
    if offset.abs() > MAX_START_DATE_OFFSET_DAYS {
        return Err(format!(
            "Start date {} is more than {} days from today",
            start, MAX_START_DATE_OFFSET_DAYS
        ));
    }
    Ok(())
}

/// Items must match the plan kind: exercises in workout plans, meals in diet plans
pub fn validate_item_kind(kind: PlanKind, item: &PlanItem) -> Result<(), String> {
    match (kind, item) {
        (PlanKind::Workout, PlanItem::Exercise { .. }) | (PlanKind::Diet, PlanItem::Meal { .. }) => Ok(()),
        (PlanKind::Workout, PlanItem::Meal { .. }) => {
            Err("Workout plans cannot contain meals".to_string())
        }
        (PlanKind::Diet, PlanItem::Exercise { .. }) => {
            Err("Diet plans cannot contain exercises".to_string())
        }
    }
}

/// Validate an item identifier used in completion keys
pub fn validate_item_identifier(identifier: &str) -> Result<(), String> {
    if identifier.trim().is_empty() {
        return Err("Item identifier cannot be empty".to_string());
    }
    if identifier.len() > MAX_ITEM_IDENTIFIER_LEN {
        return Err("Item identifier too long".to_string());
    }
    if identifier.chars().any(char::is_control) {
        return Err("Item identifier contains control characters".to_string());
    }
    Ok(())
}

/// Validate a user id before it is used to namespace storage keys
pub fn validate_user_id(user_id: &str) -> Result<(), String> {
    if user_id.is_empty() {
        return Err("User id cannot be empty".to_string());
    }
    if user_id.len() > MAX_USER_ID_LEN {
        return Err("User id too long".to_string());
    }
    if !user_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '@'))
    {
        return Err("User id contains invalid characters".to_string());
    }
    Ok(())
}

/// Validate that a completion is being recorded for a date inside the plan span
/// and not in the future
pub fn validate_completion_date(plan: &Plan, date: NaiveDate, today: NaiveDate) -> Result<(), String> {
    if date > today {
        return Err("Cannot complete items in the future".to_string());
    }
    if !plan.contains(date) {
        return Err("Date is outside the plan".to_string());
    }
    Ok(())
}
