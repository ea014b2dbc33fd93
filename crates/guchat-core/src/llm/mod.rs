//! LLM provider abstractions for gu-chat.
//!
//! - `LlmProvider`: RPITIT trait for concrete provider implementations
//! - `BoxLlmProvider`: object-safe wrapper so the provider can be chosen at runtime

pub mod box_provider;
pub mod provider;
