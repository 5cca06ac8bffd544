//! FitPlan WASM Module
//!
//! WebAssembly bindings so the browser can parse plan text and compute
//! progress locally with the same engine the backend uses. Everything crosses
//! the boundary as JSON strings.

use chrono::{DateTime, NaiveDate, Utc};
use fitplan_shared::day_status::{completion_percentage, week_view};
use fitplan_shared::parser::parse_plan_with_report;
use fitplan_shared::validation::validate_plan;
use fitplan_shared::{
    compute_progress, AchievementLedger, CompletionLog, Plan, PlanKind, ProgressInputs,
    ProgressSummary,
};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

/// Input for [`progress_summary`]
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProgressRequest {
    workout_plan: Option<Plan>,
    diet_plan: Option<Plan>,
    workout_log: CompletionLog,
    diet_log: CompletionLog,
    ledger: AchievementLedger,
}

/// Output of [`progress_summary`]; the caller stores `ledger` back
#[derive(Debug, Serialize)]
struct ProgressResponse {
    summary: ProgressSummary,
    ledger: AchievementLedger,
    ledger_changed: bool,
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| format!("Invalid date '{}': {}", raw, e))
}

fn parse_instant(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("Invalid timestamp '{}': {}", raw, e))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| e.to_string())
}

fn parse_plan_impl(kind: &str, text: &str, start_date: &str) -> Result<String, String> {
    let kind: PlanKind = kind.parse().map_err(|e: fitplan_shared::PlanError| e.to_string())?;
    let start = parse_date(start_date)?;
    let (plan, _report) = parse_plan_with_report(kind, text, start);
    to_json(&plan)
}

fn week_view_impl(plan_json: &str, log_json: &str, today: &str) -> Result<String, String> {
    let plan: Plan = serde_json::from_str(plan_json).map_err(|e| format!("Invalid plan: {}", e))?;
    let log: CompletionLog = if log_json.trim().is_empty() {
        CompletionLog::new()
    } else {
        serde_json::from_str(log_json).map_err(|e| format!("Invalid completion log: {}", e))?
    };
    let today = parse_date(today)?;
    validate_plan(&plan, today)?;
    to_json(&week_view(&plan, &log, today))
}

fn progress_summary_impl(request_json: &str, today: &str, now: &str) -> Result<String, String> {
    let request: ProgressRequest =
        serde_json::from_str(request_json).map_err(|e| format!("Invalid progress input: {}", e))?;
    let today = parse_date(today)?;
    for plan in [&request.workout_plan, &request.diet_plan].into_iter().flatten() {
        validate_plan(plan, today)?;
    }

    let mut ledger = request.ledger;
    let inputs = ProgressInputs {
        workout_plan: request.workout_plan,
        diet_plan: request.diet_plan,
        workout_log: request.workout_log,
        diet_log: request.diet_log,
    };

    let outcome = compute_progress(&inputs, &mut ledger, today, parse_instant(now)?);
    to_json(&ProgressResponse {
        summary: outcome.summary,
        ledger,
        ledger_changed: outcome.ledger_changed,
    })
}

/// Parse AI-generated plan text into plan JSON
#[wasm_bindgen]
pub fn parse_plan(kind: &str, text: &str, start_date: &str) -> Result<String, JsValue> {
    parse_plan_impl(kind, text, start_date).map_err(|e| JsValue::from_str(&e))
}

/// Classified days of the current plan week
#[wasm_bindgen]
pub fn current_week(plan_json: &str, log_json: &str, today: &str) -> Result<String, JsValue> {
    week_view_impl(plan_json, log_json, today).map_err(|e| JsValue::from_str(&e))
}

/// Full progress summary plus the updated achievement ledger
#[wasm_bindgen]
pub fn progress_summary(request_json: &str, today: &str, now: &str) -> Result<String, JsValue> {
    progress_summary_impl(request_json, today, now).map_err(|e| JsValue::from_str(&e))
}

/// Integer completion percentage (floor)
#[wasm_bindgen]
pub fn day_completion_percentage(completed: usize, total: usize) -> u32 {
    completion_percentage(completed, total)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORKOUT: &str = "Monday:\n- Squats: 3 x 5\n- Lunges: 3 x 10\nTuesday: Rest";

    #[test]
    fn test_parse_plan_json() {
        let json = parse_plan_impl("workout", WORKOUT, "2024-01-01").unwrap();
        let plan: Plan = serde_json::from_str(&json).unwrap();
        assert_eq!(plan.weekly_template[0].items.len(), 2);
        assert!(plan.weekly_template[1].is_rest_day);
    }

    #[test]
    fn test_bad_inputs_report_errors() {
        assert!(parse_plan_impl("pilates", WORKOUT, "2024-01-01").is_err());
        assert!(parse_plan_impl("workout", WORKOUT, "01/01/2024").is_err());
        assert!(progress_summary_impl("{}", "2024-01-10", "yesterday").is_err());
    }

    #[test]
    fn test_current_week_with_empty_log() {
        let plan = parse_plan_impl("workout", WORKOUT, "2024-01-01").unwrap();
        let json = week_view_impl(&plan, "", "2024-01-10").unwrap();
        let week: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(week["week_number"], 2);
    }

    #[test]
    fn test_progress_summary_round_trips_ledger() {
        let plan = parse_plan_impl("workout", WORKOUT, "2024-01-01").unwrap();
        let request = format!(
            r#"{{"workout_plan": {}, "workout_log": ["2024-01-08-Squats"]}}"#,
            plan
        );

        let json = progress_summary_impl(&request, "2024-01-08", "2024-01-08T18:00:00Z").unwrap();
        let response: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(response["summary"]["today"], "2024-01-08");
        // Jan 1 is missed and rest days never extend a streak
        assert_eq!(response["summary"]["streaks"]["workout"]["current"], 1);
        assert_eq!(response["summary"]["streaks"]["workout"]["longest"], 1);
        assert_eq!(response["ledger_changed"], false);
        assert!(response["ledger"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_progress_summary_keeps_existing_ledger() {
        let plan = parse_plan_impl("workout", WORKOUT, "2024-01-01").unwrap();
        let request = format!(
            r#"{{"workout_plan": {}, "ledger": {{"workout_week_warrior": "2024-01-05T09:00:00Z"}}}}"#,
            plan
        );

        let json = progress_summary_impl(&request, "2024-01-08", "2024-01-08T18:00:00Z").unwrap();
        let response: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(response["ledger"]["workout_week_warrior"], "2024-01-05T09:00:00Z");
        assert_eq!(response["ledger_changed"], false);
    }

    #[test]
    fn test_plans_far_from_today_are_rejected() {
        let distant = parse_plan_impl("workout", WORKOUT, "1000-01-01").unwrap();
        assert!(week_view_impl(&distant, "", "2024-01-10").is_err());

        let request = format!(r#"{{"workout_plan": {}}}"#, distant);
        let err = progress_summary_impl(&request, "2024-01-10", "2024-01-10T08:00:00Z").unwrap_err();
        assert!(err.contains("Start date"));
    }

    #[test]
    fn test_day_completion_percentage() {
        assert_eq!(day_completion_percentage(1, 3), 33);
        assert_eq!(day_completion_percentage(0, 0), 0);
    }
}
