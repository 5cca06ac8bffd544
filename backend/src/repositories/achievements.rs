//! Achievement ledger repository

use crate::storage::{read_json, user_cache_key, write_json, KeyValueStore, ACHIEVEMENTS_BASE};
use anyhow::Result;
use fitplan_shared::{AchievementLedger, StorageError};
use tracing::warn;

pub struct AchievementRepository;

impl AchievementRepository {
    pub fn key(user_id: &str) -> String {
        user_cache_key(ACHIEVEMENTS_BASE, user_id)
    }

    pub async fn load(store: &dyn KeyValueStore, user_id: &str) -> Result<AchievementLedger> {
        match read_json::<AchievementLedger>(store, &Self::key(user_id)).await {
            Ok(ledger) => Ok(ledger.unwrap_or_default()),
            Err(StorageError::Corrupt { key, source }) => {
                warn!(key = %key, error = %source, "Discarding unreadable achievement ledger");
                Ok(AchievementLedger::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn save(store: &dyn KeyValueStore, user_id: &str, ledger: &AchievementLedger) -> Result<()> {
        write_json(store, &Self::key(user_id), ledger).await?;
        Ok(())
    }

    pub async fn clear(store: &dyn KeyValueStore, user_id: &str) -> Result<()> {
        store.remove(&Self::key(user_id)).await?;
        Ok(())
    }
}
