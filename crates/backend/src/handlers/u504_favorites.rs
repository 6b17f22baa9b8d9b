use axum::{extract::State, Json};
use contracts::domain::a001_menu_item::{MenuItem, MenuItemId};
use contracts::usecases::u504_favorites::FavoriteToggled;

use crate::shared::app_state::AppState;
use crate::shared::error::AppError;
use crate::shared::extract::AppPath;
use crate::system::auth::extractor::CurrentAccount;
use crate::usecases::u504_favorites::service;

/// GET /api/favorites
pub async fn list(
    State(state): State<AppState>,
    current: CurrentAccount,
) -> Result<Json<Vec<MenuItem>>, AppError> {
    Ok(Json(service::list(&state.db, current.id()).await?))
}

/// POST /api/favorites/:menu_item_id/toggle
pub async fn toggle(
    State(state): State<AppState>,
    current: CurrentAccount,
    AppPath(menu_item_id): AppPath<i32>,
) -> Result<Json<FavoriteToggled>, AppError> {
    Ok(Json(service::toggle(&state.db, current.id(), MenuItemId(menu_item_id)).await?))
}
