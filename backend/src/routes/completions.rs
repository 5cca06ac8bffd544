//! Completion API routes

use crate::auth::RequiredUser;
use crate::error::ApiError;
use crate::routes::plans::parse_kind;
use crate::services::CompletionService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    routing::{delete, post},
    Json, Router,
};
use fitplan_shared::types::{ClearResponse, RecordCompletionRequest, RecordCompletionResponse};

/// Create completion routes
pub fn completion_routes() -> Router<AppState> {
    Router::new()
        .route("/", delete(clear_user))
        .route("/:kind", post(record_completion))
}

/// POST /api/v1/completions/:kind - Mark an exercise or meal as done
async fn record_completion(
    State(state): State<AppState>,
    user: RequiredUser,
    Path(kind): Path<String>,
    Json(req): Json<RecordCompletionRequest>,
) -> Result<Json<RecordCompletionResponse>, ApiError> {
    let kind = parse_kind(&kind)?;
    let response = CompletionService::record_completion(&state, &user.user_id, kind, req).await?;
    Ok(Json(response))
}

/// DELETE /api/v1/completions - Clear all of the user's progress
async fn clear_user(
    State(state): State<AppState>,
    user: RequiredUser,
) -> Result<Json<ClearResponse>, ApiError> {
    let response = CompletionService::clear_user(&state, &user.user_id).await?;
    Ok(Json(response))
}
