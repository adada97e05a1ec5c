// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
/// None of these are fatal: the session keeps its previous state on every path.
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    // 502 The text-generation collaborator produced no usable question
    GenerationFailure(String),

    // 502 The text-generation collaborator produced no usable analysis
    AnalysisFailure(String),

    // 502 Transport or protocol error talking to the collaborator
    ExternalService(String),

    // Malformed persisted state, recovered by falling back to defaults
    Hydration(String),

    // 400 Form-level problem (e.g. blank answer)
    Validation(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict (e.g. answering an attempt twice)
    Conflict(String),

    // 500 Internal Server Error
    InternalServerError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::GenerationFailure(msg) => write!(f, "question generation failed: {}", msg),
            AppError::AnalysisFailure(msg) => write!(f, "performance analysis failed: {}", msg),
            AppError::ExternalService(msg) => write!(f, "text generation service error: {}", msg),
            AppError::Hydration(msg) => write!(f, "could not restore saved state: {}", msg),
            AppError::Validation(msg) => write!(f, "{}", msg),
            AppError::NotFound(msg) => write!(f, "{}", msg),
            AppError::Conflict(msg) => write!(f, "{}", msg),
            AppError::InternalServerError(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::GenerationFailure(msg) => {
                tracing::warn!("Question generation failed: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "Could not generate a question, please try again".to_string(),
                )
            }
            AppError::AnalysisFailure(msg) => {
                tracing::warn!("Performance analysis failed: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "Could not analyze your performance, please try again".to_string(),
                )
            }
            AppError::ExternalService(msg) => {
                tracing::warn!("Text generation service error: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "Text generation service unavailable".to_string(),
                )
            }
            AppError::Hydration(msg) | AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };
        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::ExternalService(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}
