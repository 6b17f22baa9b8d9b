use axum::{
    body::Body,
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use super::extractor::{CurrentAccount, SessionToken};
use crate::shared::app_state::AppState;
use crate::shared::error::AppError;
use crate::system::accounts::service as account_service;

fn bearer_token(req: &Request<Body>) -> Result<String, AppError> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Auth("Missing bearer token".into()))
}

async fn authenticate(state: &AppState, req: &mut Request<Body>) -> Result<CurrentAccount, AppError> {
    let token = bearer_token(req)?;
    let account = account_service::current_session(&state.db, &token).await?;
    let current = CurrentAccount(account);
    req.extensions_mut().insert(current.clone());
    req.extensions_mut().insert(SessionToken(token));
    Ok(current)
}

/// Middleware that requires a live session
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    authenticate(&state, &mut req).await?;
    Ok(next.run(req).await)
}

/// Middleware that requires an admin session
pub async fn require_admin(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let current = authenticate(&state, &mut req).await?;
    if !current.is_admin() {
        return Err(AppError::Forbidden);
    }
    Ok(next.run(req).await)
}
