use alertd_core::{EngineError, StoreError};
use axum::{
    extract::rejection::JsonRejection,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

use crate::validation::ValidationError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Bad request: {message}")]
    BadRequest { message: String },
}

/// JSON body of every non-2xx response.
#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub code: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(error: &str, message: impl Into<String>, code: &str) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
            code: code.to_string(),
            timestamp: Utc::now(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Status, error kind and code for this error. Server-side causes stay
    /// in the log; the client only gets a generic message for them.
    fn classify(&self) -> (StatusCode, &'static str, &'static str) {
        match self {
            AppError::Engine(EngineError::Invalid(_)) | AppError::Validation { .. } => {
                (StatusCode::BAD_REQUEST, "validation_error", "VALIDATION_FAILED")
            }
            AppError::BadRequest { .. } => (StatusCode::BAD_REQUEST, "bad_request", "BAD_REQUEST"),
            AppError::Engine(EngineError::Store(StoreError::Corrupt(_))) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "database_error",
                "DATA_CORRUPT",
            ),
            AppError::Engine(EngineError::Store(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "database_error",
                "DB_ERROR",
            ),
            AppError::Engine(EngineError::Transition(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "INTERNAL_ERROR",
            ),
        }
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Engine(EngineError::Invalid(e)) => e.to_string(),
            AppError::Validation { message } | AppError::BadRequest { message } => message.clone(),
            AppError::Engine(EngineError::Store(_)) => "A database error occurred".to_string(),
            AppError::Engine(EngineError::Transition(_)) => {
                "An internal error occurred".to_string()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind, code) = self.classify();
        if status.is_server_error() {
            error!(code, "{}", self);
        } else {
            warn!(code, "{}", self);
        }

        let body = ErrorResponse::new(kind, self.client_message(), code);
        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::validation(err.to_message())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::bad_request(rejection.body_text())
    }
}

/// Fallback for paths outside the API.
pub async fn route_not_found(method: Method, uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new(
            "not_found",
            format!("No route for {} {}", method, uri.path()),
            "ROUTE_NOT_FOUND",
        )),
    )
}
