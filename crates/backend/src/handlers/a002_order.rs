use axum::{extract::State, http::StatusCode, Json};
use contracts::domain::a002_order::{
    CreateOrderRequest, Order, OrderTracking, UpdateOrderStatusRequest,
};

use crate::domain::a002_order::service;
use crate::shared::app_state::AppState;
use crate::shared::error::AppError;
use crate::shared::extract::{AppJson, AppPath};
use crate::system::auth::extractor::CurrentAccount;

/// GET /api/orders
pub async fn list_all(State(state): State<AppState>) -> Result<Json<Vec<Order>>, AppError> {
    Ok(Json(service::list_all(&state.db).await?))
}

/// GET /api/orders/mine
pub async fn list_mine(
    State(state): State<AppState>,
    current: CurrentAccount,
) -> Result<Json<Vec<Order>>, AppError> {
    Ok(Json(service::list_for_account(&state.db, current.id()).await?))
}

/// GET /api/orders/:id
///
/// `id` is the order UUID or its code.
pub async fn get_by_id(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    AppPath(id): AppPath<String>,
) -> Result<Json<Order>, AppError> {
    Ok(Json(service::get_visible_to(&state.db, &id, &account).await?))
}

/// GET /api/orders/:id/tracking
pub async fn tracking(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    AppPath(id): AppPath<String>,
) -> Result<Json<OrderTracking>, AppError> {
    Ok(Json(service::tracking(&state.db, &id, &account).await?))
}

/// POST /api/orders
pub async fn create(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>), AppError> {
    let order = service::create_from_request(&state.db, &state.cart_events, request).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// PUT /api/orders/:id/status
pub async fn update_status(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
    AppJson(request): AppJson<UpdateOrderStatusRequest>,
) -> Result<Json<Order>, AppError> {
    Ok(Json(service::update_status(&state.db, &id, request.status).await?))
}

/// DELETE /api/orders/:id
///
/// Cancels; orders are never removed.
pub async fn cancel(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    AppPath(id): AppPath<String>,
) -> Result<Json<Order>, AppError> {
    Ok(Json(service::cancel(&state.db, &id, &account).await?))
}
