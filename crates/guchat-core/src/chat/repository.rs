//! ChatRepository trait definition.
//!
//! Per-session ordered message lists keyed by the client's session string.
//! Implementations live in guchat-infra (`InMemoryChatRepository`,
//! `SqliteChatRepository`).

use guchat_types::chat::ChatMessage;
use guchat_types::error::RepositoryError;

/// Repository trait for chat message persistence.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
///
/// Ordering: `read_all` returns messages in the order `append` stored them.
/// There is no eviction or size cap; history only shrinks through `clear`.
pub trait ChatRepository: Send + Sync {
    /// Create a message and append it to the session, creating the session
    /// list if it does not exist yet. Returns the stored record.
    fn append(
        &self,
        session_id: &str,
        text: &str,
        is_user: bool,
    ) -> impl std::future::Future<Output = Result<ChatMessage, RepositoryError>> + Send;

    /// All messages for a session in insertion order. Unknown sessions
    /// yield an empty list, never an error.
    fn read_all(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send;

    /// Remove every message for a session. Idempotent.
    fn clear(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Number of messages stored for a session.
    fn count(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<usize, RepositoryError>> + Send;
}
