//! Completion log repository
//!
//! Logs are stored as bare JSON arrays of `{YYYY-MM-DD}-{identifier}` keys.
//! Recording goes through [`KeyValueStore::append_to_set`] so simultaneous
//! completions for one user are never lost.

use crate::storage::{completion_base, read_json, user_cache_key, KeyValueStore};
use anyhow::Result;
use fitplan_shared::{CompletionLog, PlanKind, StorageError};
use tracing::warn;

/// Completion log repository
pub struct CompletionRepository;

impl CompletionRepository {
    pub fn key(user_id: &str, kind: PlanKind) -> String {
        user_cache_key(completion_base(kind), user_id)
    }

    /// Load a user's completion log; an unreadable log reads as empty
    pub async fn load(store: &dyn KeyValueStore, user_id: &str, kind: PlanKind) -> Result<CompletionLog> {
        let key = Self::key(user_id, kind);
        match read_json::<CompletionLog>(store, &key).await {
            Ok(log) => Ok(log.unwrap_or_default()),
            Err(StorageError::Corrupt { key, source }) => {
                warn!(key = %key, error = %source, "Discarding unreadable completion log");
                Ok(CompletionLog::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Add one key; returns the updated log and whether the key was new
    pub async fn record(
        store: &dyn KeyValueStore,
        user_id: &str,
        kind: PlanKind,
        key: String,
    ) -> Result<(CompletionLog, bool)> {
        let inserted = store.append_to_set(&Self::key(user_id, kind), &key).await?;
        let log = Self::load(store, user_id, kind).await?;
        Ok((log, inserted))
    }

    pub async fn clear(store: &dyn KeyValueStore, user_id: &str, kind: PlanKind) -> Result<()> {
        store.remove(&Self::key(user_id, kind)).await?;
        Ok(())
    }
}
