use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use contracts::domain::a002_order::{OrderStatus, TransitionError};
use contracts::shared::error::ErrorResponse;
use thiserror::Error;

/// Errors surfaced by services and mapped onto HTTP responses
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Auth(String),

    #[error("Access denied")]
    Forbidden,

    #[error("Your cart is empty")]
    EmptyCart,

    #[error("Cannot change order status from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn not_found(what: impl Into<String>) -> Self {
        AppError::NotFound(what.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation",
            AppError::NotFound(_) => "not_found",
            AppError::Conflict(_) => "conflict",
            AppError::Auth(_) => "auth",
            AppError::Forbidden => "forbidden",
            AppError::EmptyCart => "empty_cart",
            AppError::InvalidTransition { .. } => "invalid_transition",
            AppError::Internal(_) => "internal",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::EmptyCart => StatusCode::CONFLICT,
            AppError::InvalidTransition { .. } => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<TransitionError> for AppError {
    fn from(e: TransitionError) -> Self {
        AppError::InvalidTransition {
            from: e.from,
            to: e.to,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(e: sea_orm::DbErr) -> Self {
        AppError::Internal(e.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            AppError::NotFound(what) => {
                tracing::debug!("{} not found", what);
                ErrorResponse {
                    error: "Not found".to_string(),
                    kind: None,
                }
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:#}", e);
                ErrorResponse {
                    error: "Internal server error".to_string(),
                    kind: Some(self.kind().to_string()),
                }
            }
            other => {
                tracing::warn!("{} ({})", other, status);
                ErrorResponse {
                    error: other.to_string(),
                    kind: Some(other.kind().to_string()),
                }
            }
        };
        (status, Json(body)).into_response()
    }
}
