//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Raised while compiling the route table. The application must not start.
#[derive(Error, Debug)]
pub enum BootError {
    #[error("service '{service}' references models with no bound data access: {}", .models.join(", "))]
    MissingDataAccess { service: String, models: Vec<String> },
    #[error("service '{service}' has no class-level metadata")]
    MissingServiceMetadata { service: String },
    #[error("service '{service}' declares no path")]
    MissingServicePath { service: String },
    #[error("invalid setting: {0}")]
    InvalidSetting(String),
    #[error("server: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-request failure. Data-access errors pass through the CRUD handlers unchanged.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("data access: {0}")]
    DataAccess(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("validation: {0}")]
    Validation(String),
    #[error("internal: {0}")]
    Internal(String),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::DataAccess(_) => (StatusCode::INTERNAL_SERVER_ERROR, "data_access_error"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AppError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}
