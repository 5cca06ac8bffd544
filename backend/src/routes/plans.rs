//! Plan API routes

use crate::auth::RequiredUser;
use crate::error::ApiError;
use crate::services::PlanService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use fitplan_shared::types::{ClearResponse, ImportPlanRequest, ImportPlanResponse, PlanResponse};
use fitplan_shared::PlanKind;

/// Create plan routes
pub fn plan_routes() -> Router<AppState> {
    Router::new().route("/:kind", post(import_plan).get(get_plan).delete(reset_plan))
}

/// Parse the `:kind` path segment (`workout`, `diet`, and their aliases)
pub(crate) fn parse_kind(raw: &str) -> Result<PlanKind, ApiError> {
    raw.parse::<PlanKind>().map_err(ApiError::from)
}

/// POST /api/v1/plans/:kind - Import AI-generated plan text
async fn import_plan(
    State(state): State<AppState>,
    user: RequiredUser,
    Path(kind): Path<String>,
    Json(req): Json<ImportPlanRequest>,
) -> Result<Json<ImportPlanResponse>, ApiError> {
    let kind = parse_kind(&kind)?;
    let response = PlanService::import_plan(&state, &user.user_id, kind, req).await?;
    Ok(Json(response))
}

/// GET /api/v1/plans/:kind - Stored plan with its current week
async fn get_plan(
    State(state): State<AppState>,
    user: RequiredUser,
    Path(kind): Path<String>,
) -> Result<Json<PlanResponse>, ApiError> {
    let kind = parse_kind(&kind)?;
    let response = PlanService::get_plan(&state, &user.user_id, kind).await?;
    Ok(Json(response))
}

/// DELETE /api/v1/plans/:kind - Remove a plan and its completion log
async fn reset_plan(
    State(state): State<AppState>,
    user: RequiredUser,
    Path(kind): Path<String>,
) -> Result<Json<ClearResponse>, ApiError> {
    let kind = parse_kind(&kind)?;
    let response = PlanService::reset_plan(&state, &user.user_id, kind).await?;
    Ok(Json(response))
}
