//! Redis-backed store
//!
//! Uses a `ConnectionManager` for automatic reconnection. All keys are
//! prefixed with the configured namespace. Set appends run as a Lua script so
//! the read-modify-write is atomic on the server.

use super::KeyValueStore;
use async_trait::async_trait;
use fitplan_shared::StorageError;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Script};

/// Adds ARGV[1] to the JSON array at KEYS[1]; returns 1 when it was new
const APPEND_TO_SET_SCRIPT: &str = r#"
local members = {}
local raw = redis.call('GET', KEYS[1])
if raw then
  local ok, decoded = pcall(cjson.decode, raw)
  if ok and type(decoded) == 'table' then
    members = decoded
  end
end
for _, member in ipairs(members) do
  if member == ARGV[1] then
    return 0
  end
end
table.insert(members, ARGV[1])
redis.call('SET', KEYS[1], cjson.encode(members))
return 1
"#;

#[derive(Clone)]
pub struct RedisStore {
    manager: ConnectionManager,
    key_prefix: String,
    append_script: Script,
}

impl RedisStore {
    pub fn new(manager: ConnectionManager, key_prefix: impl Into<String>) -> Self {
        Self {
            manager,
            key_prefix: key_prefix.into(),
            append_script: Script::new(APPEND_TO_SET_SCRIPT),
        }
    }

    fn build_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

fn backend_error(op: &str, err: redis::RedisError) -> StorageError {
    StorageError::Backend(format!("Redis {} failed: {}", op, err))
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut conn = self.manager.clone();
        conn.get::<_, Option<String>>(self.build_key(key))
            .await
            .map_err(|e| backend_error("GET", e))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let mut conn = self.manager.clone();
        conn.set::<_, _, ()>(self.build_key(key), value)
            .await
            .map_err(|e| backend_error("SET", e))
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut conn = self.manager.clone();
        conn.del::<_, ()>(self.build_key(key))
            .await
            .map_err(|e| backend_error("DEL", e))
    }

    async fn append_to_set(&self, key: &str, member: &str) -> Result<bool, StorageError> {
        let mut conn = self.manager.clone();
        self.append_script
            .key(self.build_key(key))
            .arg(member)
            .invoke_async::<_, i64>(&mut conn)
            .await
            .map(|added| added == 1)
            .map_err(|e| backend_error("EVALSHA", e))
    }

    async fn ping(&self) -> Result<(), StorageError> {
        let mut conn = self.manager.clone();
        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| backend_error("PING", e))
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
