//! Chat history persistence and orchestration.
//!
//! - `repository`: the `ChatRepository` port (append / read-all / clear)
//! - `context`: the trailing context window sent to the generator
//! - `prompt`: persona system prompt and contextual user prompt
//! - `service`: the request pipeline behind the chat endpoint
//! - `export`: plain-text transcripts

pub mod context;
pub mod export;
pub mod prompt;
pub mod repository;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;
