use axum::{extract::State, http::StatusCode, Json};
use contracts::system::accounts::{Account, CreateAccountDto, UpdateAccountDto};

use crate::shared::app_state::AppState;
use crate::shared::error::AppError;
use crate::shared::extract::{AppJson, AppPath};
use crate::shared::logger;
use crate::system::accounts::service as account_service;

/// GET /api/customers
pub async fn list_all(State(state): State<AppState>) -> Result<Json<Vec<Account>>, AppError> {
    Ok(Json(account_service::list(&state.db).await?))
}

/// GET /api/customers/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> Result<Json<Account>, AppError> {
    Ok(Json(account_service::get(&state.db, &id).await?))
}

/// POST /api/customers
pub async fn create(
    State(state): State<AppState>,
    AppJson(dto): AppJson<CreateAccountDto>,
) -> Result<(StatusCode, Json<Account>), AppError> {
    let account = account_service::create(&state.db, dto).await?;
    logger::log(
        &state.db,
        "sys_accounts",
        &format!("Account {} created with role {}", account.email, account.role.as_str()),
    );
    Ok((StatusCode::CREATED, Json(account)))
}

/// PUT /api/customers/:id
pub async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
    AppJson(dto): AppJson<UpdateAccountDto>,
) -> Result<Json<Account>, AppError> {
    Ok(Json(account_service::update(&state.db, &id, dto).await?))
}

/// DELETE /api/customers/:id
pub async fn delete(State(state): State<AppState>, AppPath(id): AppPath<String>) -> Result<StatusCode, AppError> {
    account_service::delete(&state.db, &id).await?;
    state.cart_events.session_ended(&id);
    logger::log(&state.db, "sys_accounts", &format!("Account {} deleted", id));
    Ok(StatusCode::NO_CONTENT)
}
