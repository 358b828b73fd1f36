use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::timeline::TimelineError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Only faults that must not reach the caller as a normal payload live here.
/// Model failures are `ServiceFault`s and are turned into `{"error": ...}`
/// records by the services themselves.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::Validation(format!("Invalid multipart body: {}", rejection.body_text()))
    }
}

impl From<MultipartError> for AppError {
    fn from(error: MultipartError) -> Self {
        AppError::Validation(format!("Invalid multipart body: {}", error.body_text()))
    }
}

/// A failure inside a service call. Never escapes to the HTTP layer as an
/// error; `into_record` turns it into the `{"error": "<Action> error: ..."}`
/// payload returned to the caller.
#[derive(Debug, Error)]
pub enum ServiceFault {
    #[error(transparent)]
    Gateway(#[from] LlmError),

    #[error(transparent)]
    Timeline(#[from] TimelineError),
}

impl ServiceFault {
    pub fn into_record(self, action: &str) -> Value {
        tracing::warn!("{action} failed: {self}");
        json!({ "error": format!("{action} error: {self}") })
    }
}
