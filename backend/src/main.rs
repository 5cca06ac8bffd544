//! FitPlan Backend
//!
//! Progress and streak analytics for AI-generated workout and diet plans.
//!
//! ## Architecture
//!
//! The backend follows a layered architecture:
//! - Routes: HTTP request handling and routing
//! - Services: Business logic on top of the shared analytics engine
//! - Repositories: Per-user documents in the key/value store
//! - Storage: Redis, or an in-memory map when Redis is disabled or down

use anyhow::Result;
use fitplan_backend::{
    clock::SystemClock,
    config, routes,
    state::AppState,
    storage::{KeyValueStore, MemoryStore, RedisStore},
};
use metrics_exporter_prometheus::PrometheusBuilder;
use redis::aio::ConnectionManager;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing();

    // Load configuration
    let config = config::AppConfig::load()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        env = if config::AppConfig::is_production() { "production" } else { "development" },
        "Starting FitPlan Backend"
    );

    // Validate production configuration
    if config::AppConfig::is_production() {
        validate_production_config(&config)?;
    }

    // Pick the storage backend (Redis when enabled and reachable)
    let store: Arc<dyn KeyValueStore> = if config.redis.enabled {
        match connect_redis(&config.redis.url).await {
            Some(conn) => Arc::new(RedisStore::new(conn, config.redis.key_prefix.clone())),
            None => {
                warn!("Falling back to in-memory store; progress will not survive restarts");
                Arc::new(MemoryStore::new())
            }
        }
    } else {
        info!("Redis disabled, using in-memory store");
        Arc::new(MemoryStore::new())
    };

    // Create application state
    let mut state = AppState::new(store, config.clone(), Arc::new(SystemClock));

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => state = state.with_metrics(handle),
        Err(e) => warn!("Failed to install Prometheus recorder: {}. /metrics disabled.", e),
    }

    // Build application
    let app = routes::create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!(address = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Connect to Redis with graceful fallback
///
/// Returns None if Redis is unavailable, letting the caller fall back to memory
async fn connect_redis(url: &str) -> Option<ConnectionManager> {
    info!("Connecting to Redis...");

    match redis::Client::open(url) {
        Ok(client) => match ConnectionManager::new(client).await {
            Ok(conn) => {
                info!("Redis connection established");
                Some(conn)
            }
            Err(e) => {
                warn!("Failed to connect to Redis: {}", e);
                None
            }
        },
        Err(e) => {
            warn!("Invalid Redis URL: {}", e);
            None
        }
    }
}

/// Initialize tracing/logging
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if config::AppConfig::is_production() {
            "fitplan_backend=info,tower_http=info".into()
        } else {
            "fitplan_backend=debug,tower_http=debug".into()
        }
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if config::AppConfig::is_production() {
        // JSON logging for production (better for log aggregation)
        subscriber
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        // Pretty logging for development
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

/// Validate configuration for production deployment
fn validate_production_config(config: &config::AppConfig) -> Result<()> {
    let mut errors = Vec::new();

    // Completion logs must be persistent in production
    if !config.redis.enabled {
        errors.push("Redis must be enabled in production (FP__REDIS__ENABLED=true)");
    }

    if config.cache.plan_ttl_secs <= 0 {
        errors.push("cache.plan_ttl_secs must be positive");
    }

    if config.redis.url.contains("localhost") || config.redis.url.contains("127.0.0.1") {
        warn!("Redis URL contains localhost - ensure this is intentional for production");
    }

    if !errors.is_empty() {
        for err in &errors {
            error!("Configuration error: {}", err);
        }
        anyhow::bail!("Invalid production configuration");
    }

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
