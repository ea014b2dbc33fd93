//! Shared domain types for gu-chat.
//!
//! This crate contains the types used across the workspace: chat messages,
//! LLM request/response shapes, configuration, and their error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
