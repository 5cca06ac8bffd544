//! Progress API routes

use crate::auth::{CurrentUser, RequiredUser};
use crate::error::ApiError;
use crate::routes::plans::parse_kind;
use crate::services::{PlanService, ProgressService};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use fitplan_shared::{ProgressSummary, WeekView};

/// Create progress routes
pub fn progress_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_summary))
        .route("/week/:kind", get(get_week))
}

/// GET /api/v1/progress - Streaks, consistency, achievements and history
///
/// Anonymous requests get the zero summary rather than an error.
async fn get_summary(State(state): State<AppState>, user: CurrentUser) -> Json<ProgressSummary> {
    Json(ProgressService::get_summary(&state, user.id()).await)
}

/// GET /api/v1/progress/week/:kind - Classified days of the current plan week
async fn get_week(
    State(state): State<AppState>,
    user: RequiredUser,
    Path(kind): Path<String>,
) -> Result<Json<WeekView>, ApiError> {
    let kind = parse_kind(&kind)?;
    let week = PlanService::current_week(&state, &user.user_id, kind).await?;
    Ok(Json(week))
}
