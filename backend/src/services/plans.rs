//! Plan service
//!
//! Imports AI-generated plan text, serves stored plans through the parsed
//! plan cache, and resets a track.

use crate::error::ApiError;
use crate::repositories::{CompletionRepository, PlanRepository};
use crate::state::AppState;
use fitplan_shared::day_status::week_view;
use fitplan_shared::parser::parse_plan_with_report;
use fitplan_shared::types::{ClearResponse, ImportPlanRequest, ImportPlanResponse, PlanResponse};
use fitplan_shared::validation::validate_plan;
use fitplan_shared::{Plan, PlanKind, WeekView};
use tracing::info;
use validator::Validate;

pub struct PlanService;

impl PlanService {
    /// Cache-through plan lookup
    pub async fn load_plan(state: &AppState, user_id: &str, kind: PlanKind) -> anyhow::Result<Option<Plan>> {
        let key = PlanRepository::key(user_id, kind);
        if let Some(plan) = state.plan_cache.get(&key).await {
            return Ok(Some(plan));
        }

        let plan = PlanRepository::find(state.store(), user_id, kind).await?;
        if let Some(plan) = &plan {
            state.plan_cache.insert(key, plan.clone()).await;
        }
        Ok(plan)
    }

    /// Parse plan text and store it as the user's plan of `kind`
    ///
    /// The completion log is left untouched; only an explicit reset clears it.
    pub async fn import_plan(
        state: &AppState,
        user_id: &str,
        kind: PlanKind,
        request: ImportPlanRequest,
    ) -> Result<ImportPlanResponse, ApiError> {
        request.validate()?;

        let today = state.clock().today();
        let start_date = request.start_date.unwrap_or(today);
        let (plan, report) = parse_plan_with_report(kind, &request.text, start_date);
        validate_plan(&plan, today).map_err(ApiError::Validation)?;

        PlanRepository::save(state.store(), user_id, &plan, state.clock().now()).await?;
        state
            .plan_cache
            .insert(PlanRepository::key(user_id, kind), plan.clone())
            .await;

        metrics::counter!("fitplan_plans_imported_total", "kind" => kind.as_str()).increment(1);
        info!(
            user_id = %user_id,
            kind = %kind,
            recognized_days = report.recognized_days,
            items = report.items,
            dropped_lines = report.dropped_lines,
            "Plan imported"
        );

        Ok(ImportPlanResponse::new(plan, report))
    }

    pub async fn get_plan(state: &AppState, user_id: &str, kind: PlanKind) -> Result<PlanResponse, ApiError> {
        let plan = Self::require_plan(state, user_id, kind).await?;
        let log = CompletionRepository::load(state.store(), user_id, kind).await?;
        let current_week = week_view(&plan, &log, state.clock().today());

        Ok(PlanResponse { plan, current_week })
    }

    /// Classified days of the current plan week
    pub async fn current_week(state: &AppState, user_id: &str, kind: PlanKind) -> Result<WeekView, ApiError> {
        Ok(Self::get_plan(state, user_id, kind).await?.current_week)
    }

    /// Remove the plan and its completion log
    pub async fn reset_plan(state: &AppState, user_id: &str, kind: PlanKind) -> Result<ClearResponse, ApiError> {
        let existed = Self::load_plan(state, user_id, kind).await?.is_some();

        PlanRepository::delete(state.store(), user_id, kind).await?;
        CompletionRepository::clear(state.store(), user_id, kind).await?;
        state.plan_cache.invalidate(&PlanRepository::key(user_id, kind)).await;

        info!(user_id = %user_id, kind = %kind, "Plan reset");
        Ok(ClearResponse { cleared: existed })
    }

    pub(crate) async fn require_plan(state: &AppState, user_id: &str, kind: PlanKind) -> Result<Plan, ApiError> {
        Self::load_plan(state, user_id, kind)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("No {} plan imported", kind)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::config::AppConfig;
    use crate::storage::MemoryStore;
    use chrono::NaiveDate;
    use std::sync::Arc;

    const WORKOUT_TEXT: &str = "Goal: Build strength\nDuration: 6 weeks\n\nMonday:\n- Squats: 3 x 5\n- Bench Press: 3 x 5\nTuesday: Rest\nWednesday:\n- Deadlift: 1 x 5";

    fn state() -> AppState {
        let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        AppState::new(
            Arc::new(MemoryStore::new()),
            AppConfig::default(),
            Arc::new(FixedClock::on(today)),
        )
    }

    fn import_request(start: Option<NaiveDate>) -> ImportPlanRequest {
        ImportPlanRequest {
            text: WORKOUT_TEXT.to_string(),
            start_date: start,
        }
    }

    #[tokio::test]
    async fn test_import_defaults_start_to_today() {
        let state = state();
        let response = PlanService::import_plan(&state, "u1", PlanKind::Workout, import_request(None))
            .await
            .unwrap();

        assert_eq!(response.plan.start_date, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
        assert_eq!(response.plan.total_weeks, 6);
        assert_eq!(response.plan.goal, "Build strength");
        assert_eq!(response.recognized_days, 3);
    }

    #[tokio::test]
    async fn test_import_rejects_start_dates_out_of_range() {
        let state = state();
        for start in [NaiveDate::from_ymd_opt(1000, 1, 1), NaiveDate::MAX.pred_opt()] {
            let result = PlanService::import_plan(&state, "u1", PlanKind::Workout, import_request(start)).await;
            assert!(matches!(result, Err(ApiError::Validation(_))));
        }
        assert!(state.plan_cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_get_plan_reports_current_week() {
        let state = state();
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        PlanService::import_plan(&state, "u1", PlanKind::Workout, import_request(Some(start)))
            .await
            .unwrap();

        let response = PlanService::get_plan(&state, "u1", PlanKind::Workout).await.unwrap();
        assert_eq!(response.current_week.week_number, 2);
        assert_eq!(response.current_week.days.len(), 7);
    }

    #[tokio::test]
    async fn test_missing_plan_is_not_found() {
        let state = state();
        let result = PlanService::get_plan(&state, "u1", PlanKind::Diet).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_reset_clears_plan_and_cache() {
        let state = state();
        PlanService::import_plan(&state, "u1", PlanKind::Workout, import_request(None))
            .await
            .unwrap();
        assert_eq!(state.plan_cache.len().await, 1);

        let cleared = PlanService::reset_plan(&state, "u1", PlanKind::Workout).await.unwrap();
        assert!(cleared.cleared);
        assert!(state.plan_cache.is_empty().await);
        assert!(PlanService::load_plan(&state, "u1", PlanKind::Workout)
            .await
            .unwrap()
            .is_none());

        let again = PlanService::reset_plan(&state, "u1", PlanKind::Workout).await.unwrap();
        assert!(!again.cleared);
    }
}
