//! HTTP error responses for the web adapter.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::domain::error::FauxtickError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<FauxtickError> for ApiError {
    fn from(err: FauxtickError) -> Self {
        let status = match &err {
            FauxtickError::Validation { .. }
            | FauxtickError::InvalidCredentials
            | FauxtickError::InactiveUser => StatusCode::BAD_REQUEST,
            FauxtickError::NotFound { .. } => StatusCode::NOT_FOUND,
            FauxtickError::Conflict { .. } => StatusCode::CONFLICT,
            FauxtickError::InvalidToken | FauxtickError::Forbidden => StatusCode::FORBIDDEN,
            FauxtickError::PasswordHash { .. }
            | FauxtickError::Database { .. }
            | FauxtickError::DatabaseQuery { .. }
            | FauxtickError::ConfigParse { .. }
            | FauxtickError::ConfigMissing { .. }
            | FauxtickError::ConfigInvalid { .. }
            | FauxtickError::EmailRender { .. }
            | FauxtickError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            code: self.status.as_u16(),
            message: self.message,
        });
        (self.status, body).into_response()
    }
}
