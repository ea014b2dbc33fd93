//! HTTP/REST API layer for gu-chat.
//!
//! Axum-based API under `/api/` with CORS, request tracing, and optional
//! static serving of the built front-end.

pub mod error;
pub mod handlers;
pub mod router;
