use axum::{extract::State, Json};
use contracts::shared::logger::LogEntry;
use serde_json::json;

use crate::shared::app_state::AppState;
use crate::shared::error::AppError;
use crate::shared::logger;

/// GET /api/logs
pub async fn list_all(State(state): State<AppState>) -> Result<Json<Vec<LogEntry>>, AppError> {
    Ok(Json(logger::repository::get_all_logs(&state.db).await?))
}

/// DELETE /api/logs
pub async fn clear_all(State(state): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let deleted = logger::repository::clear_all_logs(&state.db).await?;
    tracing::info!("Cleared {} log entries", deleted);
    Ok(Json(json!({ "deleted": deleted })))
}
