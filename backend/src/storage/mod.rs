//! Per-user key/value persistence
//!
//! Every stored value is a JSON document under a string key namespaced by
//! user id (`{base}_{user_id}`). Plans are wrapped in a [`CachedEnvelope`] that
//! records the owning user so a payload read back under the wrong account is
//! discarded instead of leaking across users.

pub mod memory;
pub mod redis;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fitplan_shared::{PlanKind, StorageError};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

pub use self::memory::MemoryStore;
pub use self::redis::RedisStore;

/// Key base for stored plans
pub fn plan_base(kind: PlanKind) -> &'static str {
    match kind {
        PlanKind::Workout => "workout_plan",
        PlanKind::Diet => "diet_plan",
    }
}

/// Key base for completion logs
pub fn completion_base(kind: PlanKind) -> &'static str {
    match kind {
        PlanKind::Workout => "completed_exercises",
        PlanKind::Diet => "completed_meals",
    }
}

/// Key base for the achievement unlock ledger
pub const ACHIEVEMENTS_BASE: &str = "achievement_unlocks";

/// Namespace a key base by user id
pub fn user_cache_key(base: &str, user_id: &str) -> String {
    format!("{}_{}", base, user_id)
}

/// Pluggable storage backend
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;

    async fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Atomically add `member` to the JSON string array stored at `key`.
    ///
    /// Concurrent appends to the same key never lose members. A missing or
    /// unreadable value starts a new array. Returns whether `member` was new.
    async fn append_to_set(&self, key: &str, member: &str) -> Result<bool, StorageError>;

    /// Verify the backend is reachable
    async fn ping(&self) -> Result<(), StorageError>;

    fn backend_name(&self) -> &'static str;
}

/// Stored payload tagged with its owner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedEnvelope<T> {
    pub user_id: String,
    pub cached_at: DateTime<Utc>,
    pub data: T,
}

impl<T> CachedEnvelope<T> {
    pub fn new(user_id: impl Into<String>, data: T, cached_at: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.into(),
            cached_at,
            data,
        }
    }
}

/// Whether a cached envelope belongs to `user_id`
pub fn validate_cached_data<T>(envelope: &CachedEnvelope<T>, user_id: &str) -> bool {
    envelope.user_id == user_id
}

/// Read and decode a JSON value
pub async fn read_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match store.get(key).await? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Corrupt {
                key: key.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

/// Encode and write a JSON value
pub async fn write_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)
        .map_err(|e| StorageError::Backend(format!("Failed to encode {}: {}", key, e)))?;
    store.set(key, raw).await
}
