use axum::{extract::State, http::StatusCode, Json};
use contracts::domain::a004_promotion::{Promotion, PromotionDto, PromotionId};

use crate::domain::a004_promotion::service;
use crate::shared::app_state::AppState;
use crate::shared::error::AppError;
use crate::shared::extract::{AppJson, AppPath};

/// GET /api/promotions
pub async fn list_all(State(state): State<AppState>) -> Result<Json<Vec<Promotion>>, AppError> {
    Ok(Json(service::list(&state.db).await?))
}

/// POST /api/promotions
pub async fn create(
    State(state): State<AppState>,
    AppJson(dto): AppJson<PromotionDto>,
) -> Result<(StatusCode, Json<Promotion>), AppError> {
    let promotion = service::create(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(promotion)))
}

/// PUT /api/promotions/:id
pub async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(dto): AppJson<PromotionDto>,
) -> Result<Json<Promotion>, AppError> {
    Ok(Json(service::update(&state.db, PromotionId(id), dto).await?))
}

/// DELETE /api/promotions/:id
pub async fn delete(State(state): State<AppState>, AppPath(id): AppPath<i32>) -> Result<StatusCode, AppError> {
    service::delete(&state.db, PromotionId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/promotions/:id/toggle
pub async fn toggle(State(state): State<AppState>, AppPath(id): AppPath<i32>) -> Result<Json<Promotion>, AppError> {
    Ok(Json(service::toggle(&state.db, PromotionId(id)).await?))
}
