//! Completion service
//!
//! Records exercise and meal completions against the scheduled plan day and
//! wipes a user's data on account switch.

use crate::error::ApiError;
use crate::repositories::{AchievementRepository, CompletionRepository, PlanRepository};
use crate::services::PlanService;
use crate::state::AppState;
use fitplan_shared::calendar::day_on;
use fitplan_shared::day_status::completed_dates;
use fitplan_shared::types::{ClearResponse, RecordCompletionRequest, RecordCompletionResponse};
use fitplan_shared::validation::{validate_completion_date, validate_item_identifier};
use fitplan_shared::{classify, completion_key, PlanKind};
use tracing::info;
use validator::Validate;

pub struct CompletionService;

impl CompletionService {
    /// Mark one scheduled item as done
    ///
    /// Recording the same item twice is a no-op (`newly_recorded == false`).
    pub async fn record_completion(
        state: &AppState,
        user_id: &str,
        kind: PlanKind,
        request: RecordCompletionRequest,
    ) -> Result<RecordCompletionResponse, ApiError> {
        request.validate()?;
        validate_item_identifier(&request.item).map_err(ApiError::Validation)?;

        let today = state.clock().today();
        let plan = PlanService::require_plan(state, user_id, kind).await?;
        let date = request.date.unwrap_or(today);
        validate_completion_date(&plan, date, today).map_err(ApiError::Validation)?;

        let day = day_on(&plan, date)
            .ok_or_else(|| ApiError::Validation("Date is outside the plan".to_string()))?;
        if day.is_rest_day {
            return Err(ApiError::Validation(format!("{} is a rest day", date)));
        }

        let item = day
            .items
            .iter()
            .find(|item| item.identifier() == request.item)
            .ok_or_else(|| {
                ApiError::Validation(format!("'{}' is not scheduled on {}", request.item, date))
            })?;

        let key = completion_key(date, item);
        let (log, newly_recorded) =
            CompletionRepository::record(state.store(), user_id, kind, key.clone()).await?;

        if newly_recorded {
            metrics::counter!("fitplan_completions_recorded_total", "kind" => kind.as_str())
                .increment(1);
            info!(user_id = %user_id, kind = %kind, key = %key, "Completion recorded");
        }

        let completed = completed_dates(&plan, &log, today);
        let progress = classify(&day, plan.start_date, &completed, &log, today);

        Ok(RecordCompletionResponse {
            key,
            newly_recorded,
            day: progress,
        })
    }

    /// Remove every plan, completion log, and achievement for a user
    pub async fn clear_user(state: &AppState, user_id: &str) -> Result<ClearResponse, ApiError> {
        for kind in [PlanKind::Workout, PlanKind::Diet] {
            PlanRepository::delete(state.store(), user_id, kind).await?;
            CompletionRepository::clear(state.store(), user_id, kind).await?;
            state.plan_cache.invalidate(&PlanRepository::key(user_id, kind)).await;
        }
        AchievementRepository::clear(state.store(), user_id).await?;

        info!(user_id = %user_id, "User progress cleared");
        Ok(ClearResponse { cleared: true })
    }
}
