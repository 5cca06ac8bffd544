//! In-process TTL cache for parsed plans
//!
//! Plans change only on import or reset, so the services keep the parsed
//! [`Plan`](fitplan_shared::Plan) around instead of re-reading and
//! re-deserializing it on every summary request. Completion logs are never
//! cached here.
//!
//! Capacity is enforced by an [`LruCache`]; freshness by the injected
//! [`Clock`], so tests can expire entries without sleeping.

use crate::clock::Clock;
use chrono::{DateTime, Duration, Utc};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    cached_at: DateTime<Utc>,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now >= self.cached_at + ttl
    }
}

/// Key/value cache with a fixed time-to-live and least-recently-used eviction
pub struct TtlCache<V> {
    entries: Mutex<LruCache<String, CacheEntry<V>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> TtlCache<V> {
    /// Capacity used when the configured entry cap is zero
    const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1000) {
        Some(n) => n,
        None => unreachable!(),
    };

    pub fn new(ttl: Duration, max_entries: usize, clock: Arc<dyn Clock>) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(Self::DEFAULT_CAPACITY);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
            clock,
        }
    }

    /// Fresh value for `key`; expired entries are dropped on read
    pub async fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        let mut entries = self.entries.lock().await;

        match entries.get(key) {
            Some(entry) if !entry.is_expired(now, self.ttl) => Some(entry.value.clone()),
            Some(_) => {
                entries.pop(key);
                None
            }
            None => None,
        }
    }

    /// Insert or replace; at capacity the least recently used entry goes
    pub async fn insert(&self, key: impl Into<String>, value: V) {
        let entry = CacheEntry {
            value,
            cached_at: self.clock.now(),
        };
        self.entries.lock().await.put(key.into(), entry);
    }

    pub async fn invalidate(&self, key: &str) {
        self.entries.lock().await.pop(key);
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::NaiveDate;

    fn setup(ttl_secs: i64, max_entries: usize) -> (Arc<FixedClock>, TtlCache<u32>) {
        let clock = Arc::new(FixedClock::on(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()));
        let cache = TtlCache::new(Duration::seconds(ttl_secs), max_entries, clock.clone());
        (clock, cache)
    }

    #[tokio::test]
    async fn test_entries_expire_after_ttl() {
        let (clock, cache) = setup(60, 10);
        cache.insert("a", 1).await;
        assert_eq!(cache.get("a").await, Some(1));

        clock.advance(Duration::seconds(59));
        assert_eq!(cache.get("a").await, Some(1));

        clock.advance(Duration::seconds(1));
        assert_eq!(cache.get("a").await, None);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_least_recently_used_evicted_at_capacity() {
        let (_clock, cache) = setup(600, 2);
        cache.insert("a", 1).await;
        cache.insert("b", 2).await;
        // Touch "a" so "b" becomes the eviction candidate
        assert_eq!(cache.get("a").await, Some(1));
        cache.insert("c", 3).await;

        assert_eq!(cache.len().await, 2);
        assert_eq!(cache.get("b").await, None);
        assert_eq!(cache.get("a").await, Some(1));
        assert_eq!(cache.get("c").await, Some(3));
    }

    #[tokio::test]
    async fn test_overwrite_does_not_evict() {
        let (_clock, cache) = setup(600, 2);
        cache.insert("a", 1).await;
        cache.insert("b", 2).await;
        cache.insert("b", 20).await;

        assert_eq!(cache.get("a").await, Some(1));
        assert_eq!(cache.get("b").await, Some(20));
    }

    #[tokio::test]
    async fn test_overwrite_restarts_ttl() {
        let (clock, cache) = setup(60, 10);
        cache.insert("a", 1).await;
        clock.advance(Duration::seconds(45));
        cache.insert("a", 2).await;
        clock.advance(Duration::seconds(45));

        assert_eq!(cache.get("a").await, Some(2));
    }

    #[tokio::test]
    async fn test_zero_capacity_falls_back_to_default() {
        let (_clock, cache) = setup(600, 0);
        for i in 0..10 {
            cache.insert(format!("k{}", i), i).await;
        }
        assert_eq!(cache.len().await, 10);
    }

    #[tokio::test]
    async fn test_invalidate() {
        let (_clock, cache) = setup(600, 10);
        cache.insert("a", 1).await;
        cache.invalidate("a").await;
        assert_eq!(cache.get("a").await, None);
    }
}
