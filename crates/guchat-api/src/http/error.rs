//! Application error type mapping to HTTP status codes.
//!
//! Bodies are `{ "error": <message>, "code": <MACHINE_CODE> }`. Internal
//! details are logged, never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use guchat_types::error::ChatError;

/// Reply text when the generator fails.
pub const GENERATION_FAILED: &str = "The heavens are silent. Try again, mortal.";
/// Reply text for any other failure of the chat endpoint.
pub const CHAT_FAILED: &str = "The path to refinement is blocked. Try again.";

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Failure inside `POST /api/chat`.
    Chat(ChatError),
    /// Bad input (400).
    Validation(String),
    /// Nothing to return (404).
    NotFound(String),
    /// Failure with a route-specific public message (500).
    Internal(String),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Chat(ChatError::Validation(msg)) | AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg)
            }
            AppError::Chat(ChatError::Generation(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "GENERATION_FAILED",
                GENERATION_FAILED.to_string(),
            ),
            AppError::Chat(ChatError::Storage(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORAGE_ERROR",
                CHAT_FAILED.to_string(),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
        };

        (status, Json(json!({ "error": message, "code": code }))).into_response()
    }
}
