//! Application error type and its HTTP mapping.
//!
//! Every pipeline operation returns [`AppError`]; axum turns it into a status
//! code plus a `{"message": ...}` JSON body.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::{auth::jwt::TokenError, users::repo::RepoError};

#[derive(Debug, Error)]
pub enum AppError {
    /// Input failed a format check (400).
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// Malformed request or credential, e.g. a bad authorization header (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// No authenticated identity, or credentials rejected (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Uniqueness violation (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Resource does not exist (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Storage, transport or signing failure (500).
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidFormat(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::InvalidFormat(m)
            | AppError::BadRequest(m)
            | AppError::Unauthorized(m)
            | AppError::Conflict(m)
            | AppError::NotFound(m) => m,
            AppError::Internal(e) => {
                // Don't expose internal details to clients
                error!(error = ?e, "internal error");
                "internal server error".to_string()
            }
        };
        (status, Json(ErrorBody { message })).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Conflict => AppError::Conflict("phone number already existed".into()),
            RepoError::Database(source) => {
                AppError::Internal(anyhow::Error::new(source).context("database operation failed"))
            }
        }
    }
}

impl From<TokenError> for AppError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Signing(_) | TokenError::Key(_) | TokenError::LifetimeOutOfRange => {
                AppError::Internal(anyhow::Error::new(e).context("access token signing failed"))
            }
            other => AppError::BadRequest(other.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
