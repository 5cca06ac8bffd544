//! Route definitions for the FitPlan API
//!
//! This module organizes all API routes and applies middleware.

use crate::auth::USER_ID_HEADER;
use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod completions;
mod health;
mod plans;
mod progress;


pub use completions::completion_routes;
pub use plans::plan_routes;
pub use progress::progress_routes;

/// Create the main application router with all middleware
pub fn create_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config().server.request_timeout_secs);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .route("/metrics", get(render_metrics))
        .nest("/api/v1", api_routes())
        // Apply middleware layers
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(timeout))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE, USER_ID_HEADER.clone()]),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API v1 routes
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { "FitPlan API v1" }))
        .nest("/plans", plans::plan_routes())
        .nest("/completions", completions::completion_routes())
        .nest("/progress", progress::progress_routes())
}

/// GET /metrics - Prometheus text exposition
async fn render_metrics(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (
            StatusCode::NOT_FOUND,
            "metrics recorder not installed".to_string(),
        ),
    }
}
