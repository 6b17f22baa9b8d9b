use axum::{extract::State, http::StatusCode, Json};
use contracts::system::accounts::{Account, RegisterRequest};
use contracts::system::auth::{AccountInfo, LoginRequest, LoginResponse};

use crate::shared::app_state::AppState;
use crate::shared::error::AppError;
use crate::shared::extract::AppJson;
use crate::shared::logger;
use crate::system::accounts::service as account_service;
use crate::system::auth::extractor::{CurrentAccount, SessionToken};

/// POST /api/system/auth/register
pub async fn register(
    State(state): State<AppState>,
    AppJson(request): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<Account>), AppError> {
    let account = account_service::register(&state.db, request).await?;
    logger::log(&state.db, "sys_accounts", &format!("{} registered", account.email));
    Ok((StatusCode::CREATED, Json(account)))
}

/// POST /api/system/auth/login
pub async fn login(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let (token, account) = account_service::authenticate(&state.db, &request).await?;
    tracing::info!("{} signed in as {}", account.email, account.role.as_str());
    Ok(Json(LoginResponse {
        token,
        account: AccountInfo::from(&account),
    }))
}

/// POST /api/system/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    current: CurrentAccount,
    SessionToken(token): SessionToken,
) -> Result<StatusCode, AppError> {
    account_service::logout(&state.db, &token).await?;
    state.cart_events.session_ended(current.id());
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/system/auth/me
pub async fn current_account(CurrentAccount(account): CurrentAccount) -> Json<Account> {
    Json(account)
}
