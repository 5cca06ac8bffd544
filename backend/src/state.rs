//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction.
//!
//! All fields are behind `Arc` (or already cheap to clone) and the state is
//! read-only during request handling; mutable data lives in the store and the
//! plan cache, both of which synchronize internally.

use crate::cache::TtlCache;
use crate::clock::Clock;
use crate::config::AppConfig;
use crate::storage::KeyValueStore;
use chrono::Duration;
use fitplan_shared::Plan;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Per-user persistence (Redis or in-memory)
    pub store: Arc<dyn KeyValueStore>,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Parsed plans keyed by storage key
    pub plan_cache: Arc<TtlCache<Plan>>,
    /// Source of "now" and "today"
    pub clock: Arc<dyn Clock>,
    /// Prometheus render handle, when a recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(store: Arc<dyn KeyValueStore>, config: AppConfig, clock: Arc<dyn Clock>) -> Self {
        let plan_cache = TtlCache::new(
            Duration::seconds(config.cache.plan_ttl_secs),
            config.cache.max_entries,
            clock.clone(),
        );

        Self {
            store,
            config: Arc::new(config),
            plan_cache: Arc::new(plan_cache),
            clock,
            metrics: None,
        }
    }

    /// Attach the Prometheus handle served at `/metrics`
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    #[inline]
    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[inline]
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }
}
