use axum::{extract::State, http::StatusCode, Json};
use contracts::domain::a001_menu_item::{MenuItem, MenuItemDto, MenuItemId};

use crate::domain::a001_menu_item::service;
use crate::shared::app_state::AppState;
use crate::shared::error::AppError;
use crate::shared::extract::{AppJson, AppPath};

/// GET /api/menu
pub async fn list_all(State(state): State<AppState>) -> Result<Json<Vec<MenuItem>>, AppError> {
    Ok(Json(service::list(&state.db).await?))
}

/// GET /api/menu/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<MenuItem>, AppError> {
    Ok(Json(service::get(&state.db, MenuItemId(id)).await?))
}

/// POST /api/menu
pub async fn create(
    State(state): State<AppState>,
    AppJson(dto): AppJson<MenuItemDto>,
) -> Result<(StatusCode, Json<MenuItem>), AppError> {
    let item = service::create(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /api/menu/:id
pub async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(dto): AppJson<MenuItemDto>,
) -> Result<Json<MenuItem>, AppError> {
    Ok(Json(service::update(&state.db, MenuItemId(id), dto).await?))
}

/// DELETE /api/menu/:id
pub async fn delete(State(state): State<AppState>, AppPath(id): AppPath<i32>) -> Result<StatusCode, AppError> {
    service::delete(&state.db, MenuItemId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
