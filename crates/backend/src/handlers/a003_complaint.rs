use axum::{extract::State, http::StatusCode, Json};
use contracts::domain::a003_complaint::{
    Complaint, FileComplaintRequest, UpdateComplaintStatusRequest,
};

use crate::domain::a003_complaint::service;
use crate::shared::app_state::AppState;
use crate::shared::error::AppError;
use crate::shared::extract::{AppJson, AppPath};
use crate::system::auth::extractor::CurrentAccount;

/// GET /api/complaints
pub async fn list_all(State(state): State<AppState>) -> Result<Json<Vec<Complaint>>, AppError> {
    Ok(Json(service::list_all(&state.db).await?))
}

/// GET /api/complaints/mine
pub async fn list_mine(
    State(state): State<AppState>,
    current: CurrentAccount,
) -> Result<Json<Vec<Complaint>>, AppError> {
    Ok(Json(service::list_for_account(&state.db, current.id()).await?))
}

/// POST /api/complaints
pub async fn create(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    AppJson(request): AppJson<FileComplaintRequest>,
) -> Result<(StatusCode, Json<Complaint>), AppError> {
    let complaint = service::file_complaint(&state.db, &account, request).await?;
    Ok((StatusCode::CREATED, Json(complaint)))
}

/// PUT /api/complaints/:id/status
pub async fn update_status(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
    AppJson(request): AppJson<UpdateComplaintStatusRequest>,
) -> Result<Json<Complaint>, AppError> {
    Ok(Json(service::update_status(&state.db, &id, request.status).await?))
}
