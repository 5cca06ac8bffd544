//! API request and response types

use crate::day_status::{DayProgress, WeekView};
use crate::parser::ParseReport;
use crate::plan::Plan;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Import an AI-generated plan text
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ImportPlanRequest {
    #[validate(length(min = 1, max = 50000, message = "Plan text must be 1-50000 characters"))]
    pub text: String,
    /// Defaults to today when omitted
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

/// Result of a plan import
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportPlanResponse {
    pub plan: Plan,
    pub recognized_days: usize,
    pub defaulted_rest_days: usize,
    pub items: usize,
    pub dropped_lines: usize,
}

impl ImportPlanResponse {
    pub fn new(plan: Plan, report: ParseReport) -> Self {
        Self {
            plan,
            recognized_days: report.recognized_days,
            defaulted_rest_days: report.defaulted_rest_days,
            items: report.items,
            dropped_lines: report.dropped_lines,
        }
    }
}

/// Stored plan together with its current week
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanResponse {
    pub plan: Plan,
    pub current_week: WeekView,
}

/// Mark one exercise or meal as done
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecordCompletionRequest {
    /// Defaults to today when omitted
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Exercise name, or `{mealType}-{mealName}` for meals
    #[validate(length(min = 1, max = 200, message = "Item must be 1-200 characters"))]
    pub item: String,
}

/// Result of recording a completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordCompletionResponse {
    pub key: String,
    /// False when the key was already in the log
    pub newly_recorded: bool,
    pub day: DayProgress,
}

/// Result of a reset or clear
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearResponse {
    pub cleared: bool,
}
