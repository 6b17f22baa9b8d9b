use axum::{extract::State, http::StatusCode, Json};
use contracts::domain::a002_order::Order;
use contracts::usecases::u502_checkout::{CheckoutDraftPatch, CheckoutView};

use crate::shared::app_state::AppState;
use crate::shared::error::AppError;
use crate::shared::extract::AppJson;
use crate::system::auth::extractor::CurrentAccount;
use crate::usecases::u502_checkout::service;

/// POST /api/checkout/start
pub async fn start(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
) -> Result<Json<CheckoutView>, AppError> {
    Ok(Json(service::start(&state.db, &account).await?))
}

/// GET /api/checkout/draft
pub async fn get_draft(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
) -> Result<Json<CheckoutView>, AppError> {
    Ok(Json(service::get_draft(&state.db, &account).await?))
}

/// PATCH /api/checkout/draft
pub async fn update_draft(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    AppJson(patch): AppJson<CheckoutDraftPatch>,
) -> Result<Json<CheckoutView>, AppError> {
    Ok(Json(service::update_draft(&state.db, &account, patch).await?))
}

/// POST /api/checkout/place-order
pub async fn place_order(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
) -> Result<(StatusCode, Json<Order>), AppError> {
    let order = service::place_order(&state.db, &state.cart_events, &account).await?;
    Ok((StatusCode::CREATED, Json(order)))
}
