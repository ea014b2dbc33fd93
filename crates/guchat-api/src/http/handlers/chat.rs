//! Chat HTTP handlers.
//!
//! Endpoints:
//! - POST   /api/chat                    - Send a message, get the persona's reply
//! - GET    /api/chat/{sessionId}        - Full ordered history
//! - DELETE /api/chat/{sessionId}        - Clear history
//! - GET    /api/chat/{sessionId}/export - Plain-text transcript download

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use guchat_types::chat::ChatMessage;

use crate::http::error::AppError;
use crate::state::AppState;

const FIELDS_REQUIRED: &str = "Session ID and message are required";

/// Request body for `POST /api/chat`.
///
/// Both fields are optional at the serde level so a missing field yields
/// the same 400 as an empty one.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    pub response: String,
    pub message_id: Uuid,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub history: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub success: bool,
}

/// POST /api/chat
pub async fn send_message(
    State(state): State<AppState>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<Json<SendMessageResponse>, AppError> {
    let Json(body) = payload.map_err(|rejection| {
        tracing::warn!(error = %rejection.body_text(), "Rejected chat request body");
        AppError::Validation(FIELDS_REQUIRED.to_string())
    })?;

    let session_id = body.session_id.unwrap_or_default();
    let message = body.message.unwrap_or_default();
    if session_id.is_empty() || message.is_empty() {
        return Err(AppError::Validation(FIELDS_REQUIRED.to_string()));
    }

    let reply = state.chat_service.send_message(&session_id, &message).await?;

    Ok(Json(SendMessageResponse {
        response: reply.text,
        message_id: reply.id,
        timestamp: reply.timestamp,
    }))
}

/// GET /api/chat/{sessionId}
pub async fn get_history(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<HistoryResponse>, AppError> {
    let history = state.chat_service.history(&session_id).await.map_err(|e| {
        tracing::error!(session_id = %session_id, error = %e, "Get history failed");
        AppError::Internal("Failed to retrieve conversation history".to_string())
    })?;

    Ok(Json(HistoryResponse { history }))
}

/// DELETE /api/chat/{sessionId}
pub async fn clear_history(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ClearResponse>, AppError> {
    state
        .chat_service
        .clear_history(&session_id)
        .await
        .map_err(|e| {
            tracing::error!(session_id = %session_id, error = %e, "Clear history failed");
            AppError::Internal("Failed to clear conversation history".to_string())
        })?;

    Ok(Json(ClearResponse { success: true }))
}

/// GET /api/chat/{sessionId}/export
pub async fn export_history(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Response, AppError> {
    let transcript = state
        .chat_service
        .export_transcript(&session_id)
        .await
        .map_err(|e| {
            tracing::error!(session_id = %session_id, error = %e, "Export failed");
            AppError::Internal("Failed to export conversation history".to_string())
        })?
        .ok_or_else(|| AppError::NotFound("No conversation history to export".to_string()))?;

    let disposition = format!("attachment; filename=\"{}\"", transcript.filename);
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        transcript.body,
    )
        .into_response())
}
