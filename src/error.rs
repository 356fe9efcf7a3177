/*
 * Responsibility
 * - アプリ共通の AppError 定義 (BadRequest / Unauthorized / NotFound / Operational)
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - RepoError を文脈付きで AppError に変換
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

/// Transport-neutral classification of an [`AppError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    Unauthorized,
    NotFound,
    Operational,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{code}: {message}")]
    BadRequest { code: &'static str, message: String },
    #[error("unauthorized: {context}")]
    Unauthorized { context: String },
    #[error("not found: {resource}")]
    NotFound { resource: &'static str },
    #[error("operational error: {context}")]
    Operational { context: String },
}

impl AppError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
        }
    }

    pub fn unauthorized(context: impl Into<String>) -> Self {
        Self::Unauthorized {
            context: context.into(),
        }
    }

    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }

    pub fn operational(context: impl Into<String>) -> Self {
        Self::Operational {
            context: context.into(),
        }
    }

    /// Wrap a storage failure. Unique-key conflicts are the client's fault.
    pub fn from_repo(err: RepoError, context: &str) -> Self {
        match err {
            RepoError::Conflict => {
                Self::bad_request("USERNAME_TAKEN", "username is already registered")
            }
            other => Self::operational(format!("{context}: {other}")),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::BadRequest { .. } => ErrorKind::BadRequest,
            AppError::Unauthorized { .. } => ErrorKind::Unauthorized,
            AppError::NotFound { .. } => ErrorKind::NotFound,
            AppError::Operational { .. } => ErrorKind::Operational,
        }
    }

    /// Stable machine-readable code plus the message that is safe to show a client.
    pub fn public_parts(&self) -> (&'static str, String) {
        match self {
            AppError::BadRequest { code, message } => (*code, message.clone()),
            AppError::Unauthorized { context } => ("UNAUTHORIZED", context.clone()),
            AppError::NotFound { resource } => ("NOT_FOUND", format!("{resource} not found.")),
            AppError::Operational { .. } => {
                ("INTERNAL_SERVER_ERROR", "internal server error".into())
            }
        }
    }

    /// Log at the level the error class deserves. Only adapters call this.
    pub fn log(&self) {
        match self.kind() {
            ErrorKind::Operational => tracing::error!(error = %self, "request failed"),
            ErrorKind::Unauthorized => tracing::warn!(error = %self, "request rejected"),
            ErrorKind::BadRequest | ErrorKind::NotFound => {
                tracing::debug!(error = %self, "request rejected")
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();

        let status = match self.kind() {
            ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Operational => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let (code, message) = self.public_parts();

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}
