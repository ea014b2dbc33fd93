//! Business logic and port trait definitions for gu-chat.
//!
//! This crate defines the "ports" (the message store and the text generator)
//! that the infrastructure layer implements, plus the chat orchestration that
//! ties them together. It depends only on `guchat-types` -- never on
//! `guchat-infra` or any database/IO crate.

pub mod chat;
pub mod llm;
