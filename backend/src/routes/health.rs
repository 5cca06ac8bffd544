//! Service health routes
//!
//! `/health` and `/health/live` answer as long as the process is serving
//! requests. `/health/ready` additionally pings the plan store and reports
//! which backend (memory or redis) answered.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<HealthChecks>,
}

#[derive(Serialize)]
pub struct HealthChecks {
    pub store: CheckStatus,
}

/// Outcome of pinging one dependency
#[derive(Serialize)]
pub struct CheckStatus {
    pub status: String,
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
    })
}

/// 200 with `ready` once the store answers a ping, 503 with the store error otherwise
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let backend = state.store().backend_name().to_string();
    let store_check = match state.store().ping().await {
        Ok(()) => CheckStatus {
            status: "healthy".to_string(),
            backend,
            message: None,
        },
        Err(e) => CheckStatus {
            status: "unhealthy".to_string(),
            backend,
            message: Some(e.to_string()),
        },
    };

    let is_healthy = store_check.status == "healthy";

    let response = HealthResponse {
        status: if is_healthy { "ready" } else { "not_ready" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: Some(HealthChecks { store: store_check }),
    };

    if is_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

/// Process is up; never touches the store
pub async fn liveness_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "alive".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
    })
}
