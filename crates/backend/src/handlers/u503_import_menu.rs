use axum::{extract::State, Json};
use contracts::usecases::u503_import_menu::{ImportMenuRequest, ImportMenuResponse};

use crate::shared::app_state::AppState;
use crate::shared::error::AppError;
use crate::shared::extract::AppJson;
use crate::usecases::u503_import_menu::ImportExecutor;

/// POST /api/u503/import-menu
///
/// A failed fetch is reported in the body with outcome "failed", not as an HTTP error.
pub async fn import_menu(
    State(state): State<AppState>,
    AppJson(request): AppJson<ImportMenuRequest>,
) -> Result<Json<ImportMenuResponse>, AppError> {
    let executor = ImportExecutor::from_request(&state.config.menu_import, &request)?;
    Ok(Json(executor.run(&state.db).await?))
}
