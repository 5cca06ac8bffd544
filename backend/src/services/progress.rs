//! Progress summary service
//!
//! Re-reads both completion logs on every call and never fails: with no
//! signed-in user, or when storage cannot be read, the zero summary is
//! returned instead.

use crate::repositories::{AchievementRepository, CompletionRepository};
use crate::services::PlanService;
use crate::state::AppState;
use chrono::NaiveDate;
use fitplan_shared::{compute_progress, PlanKind, ProgressInputs, ProgressSummary};
use tracing::{debug, warn};

pub struct ProgressService;

impl ProgressService {
    pub async fn get_summary(state: &AppState, user_id: Option<&str>) -> ProgressSummary {
        let today = state.clock().today();
        let Some(user_id) = user_id else {
            return ProgressSummary::empty(today);
        };

        match Self::compute(state, user_id, today).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Progress computation failed, returning empty summary");
                metrics::counter!("fitplan_summary_fallbacks_total").increment(1);
                ProgressSummary::empty(today)
            }
        }
    }

    async fn load_inputs(state: &AppState, user_id: &str) -> anyhow::Result<ProgressInputs> {
        Ok(ProgressInputs {
            workout_plan: PlanService::load_plan(state, user_id, PlanKind::Workout).await?,
            diet_plan: PlanService::load_plan(state, user_id, PlanKind::Diet).await?,
            workout_log: CompletionRepository::load(state.store(), user_id, PlanKind::Workout).await?,
            diet_log: CompletionRepository::load(state.store(), user_id, PlanKind::Diet).await?,
        })
    }

    async fn compute(state: &AppState, user_id: &str, today: NaiveDate) -> anyhow::Result<ProgressSummary> {
        let inputs = Self::load_inputs(state, user_id).await?;
        let mut ledger = AchievementRepository::load(state.store(), user_id).await?;

        let outcome = compute_progress(&inputs, &mut ledger, today, state.clock().now());

        if outcome.ledger_changed {
            debug!(user_id = %user_id, unlocked = ledger.len(), "Persisting achievement unlocks");
            if let Err(e) = AchievementRepository::save(state.store(), user_id, &ledger).await {
                warn!(user_id = %user_id, error = %e, "Failed to persist achievement unlocks");
            }
        }

        Ok(outcome.summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::config::AppConfig;
    use crate::storage::{KeyValueStore, MemoryStore};
    use async_trait::async_trait;
    use fitplan_shared::StorageError;
    use std::sync::Arc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    struct UnavailableStore;

    #[async_trait]
    impl KeyValueStore for UnavailableStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Backend("down".to_string()))
        }

        async fn set(&self, _key: &str, _value: String) -> Result<(), StorageError> {
            Err(StorageError::Backend("down".to_string()))
        }

        async fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Backend("down".to_string()))
        }

        async fn append_to_set(&self, _key: &str, _member: &str) -> Result<bool, StorageError> {
            Err(StorageError::Backend("down".to_string()))
        }

        async fn ping(&self) -> Result<(), StorageError> {
            Err(StorageError::Backend("down".to_string()))
        }

        fn backend_name(&self) -> &'static str {
            "unavailable"
        }
    }

    #[tokio::test]
    async fn test_no_user_yields_zero_summary() {
        let state = AppState::new(
            Arc::new(MemoryStore::new()),
            AppConfig::default(),
            Arc::new(FixedClock::on(date(2024, 3, 1))),
        );

        let summary = ProgressService::get_summary(&state, None).await;
        assert_eq!(summary, ProgressSummary::empty(date(2024, 3, 1)));
    }

    #[tokio::test]
    async fn test_storage_failure_falls_back_to_zero_summary() {
        let state = AppState::new(
            Arc::new(UnavailableStore),
            AppConfig::default(),
            Arc::new(FixedClock::on(date(2024, 3, 1))),
        );

        let summary = ProgressService::get_summary(&state, Some("u1")).await;
        assert_eq!(summary.streaks.overall.current, 0);
        assert!(summary.history.is_empty());
    }

    #[tokio::test]
    async fn test_user_without_plans_gets_fallback_history() {
        let state = AppState::new(
            Arc::new(MemoryStore::new()),
            AppConfig::default(),
            Arc::new(FixedClock::on(date(2024, 3, 1))),
        );

        let summary = ProgressService::get_summary(&state, Some("u1")).await;
        assert_eq!(summary.history.len(), 90);
        assert!(summary.history.iter().all(|entry| !entry.overall_done));
        assert!(summary.achievements.is_empty());
    }
}
