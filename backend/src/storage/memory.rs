//! In-memory store used in development, tests, and as the Redis fallback

use super::KeyValueStore;
use async_trait::async_trait;
use fitplan_shared::StorageError;
use std::collections::{BTreeSet, HashMap};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn append_to_set(&self, key: &str, member: &str) -> Result<bool, StorageError> {
        // The write guard spans the read-modify-write
        let mut entries = self.entries.write().await;
        let mut members: BTreeSet<String> = entries
            .get(key)
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_default();
        if !members.insert(member.to_string()) {
            return Ok(false);
        }

        let raw = serde_json::to_string(&members)
            .map_err(|e| StorageError::Backend(format!("Failed to encode {}: {}", key, e)))?;
        entries.insert(key.to_string(), raw);
        Ok(true)
    }

    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
