//! Infrastructure layer for gu-chat.
//!
//! Contains implementations of the ports defined in `guchat-core`:
//! in-memory and SQLite message stores, the runtime store selector,
//! Gemini and OpenAI-compatible generators, and the config loader.

pub mod config;
pub mod llm;
pub mod memory;
pub mod sqlite;
pub mod store;
