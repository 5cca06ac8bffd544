//! Plan repository

use crate::storage::{
    plan_base, read_json, user_cache_key, validate_cached_data, write_json, CachedEnvelope,
    KeyValueStore,
};
use anyhow::Result;
use chrono::{DateTime, Utc};
use fitplan_shared::{Plan, PlanKind, StorageError};
use tracing::warn;

/// Plan repository for per-user plan documents
pub struct PlanRepository;

impl PlanRepository {
    pub fn key(user_id: &str, kind: PlanKind) -> String {
        user_cache_key(plan_base(kind), user_id)
    }

    /// Load the user's plan of `kind`
    ///
    /// Corrupt payloads and payloads owned by another user are treated as
    /// absent; the latter are also removed.
    pub async fn find(store: &dyn KeyValueStore, user_id: &str, kind: PlanKind) -> Result<Option<Plan>> {
        let key = Self::key(user_id, kind);

        let envelope: CachedEnvelope<Plan> = match read_json(store, &key).await {
            Ok(Some(envelope)) => envelope,
            Ok(None) => return Ok(None),
            Err(StorageError::Corrupt { key, source }) => {
                warn!(key = %key, error = %source, "Discarding unreadable plan");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        if !validate_cached_data(&envelope, user_id) {
            warn!(
                key = %key,
                owner = %envelope.user_id,
                "Plan belongs to a different user, discarding"
            );
            store.remove(&key).await?;
            return Ok(None);
        }

        if envelope.data.kind != kind {
            warn!(key = %key, stored = %envelope.data.kind, "Plan kind mismatch, ignoring");
            return Ok(None);
        }

        Ok(Some(envelope.data))
    }

    pub async fn save(
        store: &dyn KeyValueStore,
        user_id: &str,
        plan: &Plan,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let envelope = CachedEnvelope::new(user_id, plan, now);
        write_json(store, &Self::key(user_id, plan.kind), &envelope).await?;
        Ok(())
    }

    pub async fn delete(store: &dyn KeyValueStore, user_id: &str, kind: PlanKind) -> Result<()> {
        store.remove(&Self::key(user_id, kind)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::NaiveDate;
    use fitplan_shared::parser::parse_plan;

    fn sample_plan() -> Plan {
        parse_plan(
            PlanKind::Workout,
            "Goal: Strength\nMonday:\n- Squats: 3 x 5\nTuesday: Rest",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_save_and_find() {
        let store = MemoryStore::new();
        let plan = sample_plan();
        PlanRepository::save(&store, "u1", &plan, Utc::now()).await.unwrap();

        let found = PlanRepository::find(&store, "u1", PlanKind::Workout).await.unwrap();
        assert_eq!(found, Some(plan));

        let other_kind = PlanRepository::find(&store, "u1", PlanKind::Diet).await.unwrap();
        assert!(other_kind.is_none());
    }

    #[tokio::test]
    async fn test_foreign_envelope_is_discarded() {
        let store = MemoryStore::new();
        let plan = sample_plan();
        let envelope = CachedEnvelope::new("someone-else", &plan, Utc::now());
        write_json(&store, &PlanRepository::key("u1", PlanKind::Workout), &envelope)
            .await
            .unwrap();

        let found = PlanRepository::find(&store, "u1", PlanKind::Workout).await.unwrap();
        assert!(found.is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_corrupt_plan_reads_as_absent() {
        let store = MemoryStore::new();
        store
            .set(&PlanRepository::key("u1", PlanKind::Workout), "[1, 2".to_string())
            .await
            .unwrap();

        let found = PlanRepository::find(&store, "u1", PlanKind::Workout).await.unwrap();
        assert!(found.is_none());
    }
}
