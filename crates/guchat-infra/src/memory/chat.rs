//! In-memory chat repository backed by a concurrent map.

use dashmap::DashMap;

use guchat_core::chat::repository::ChatRepository;
use guchat_types::chat::ChatMessage;
use guchat_types::error::RepositoryError;

/// `ChatRepository` keeping each session's messages in a `Vec`.
///
/// Appends to one session take that entry's shard lock, so each push lands
/// at a distinct position; concurrent requests interleave in completion order.
#[derive(Default)]
pub struct InMemoryChatRepository {
    sessions: DashMap<String, Vec<ChatMessage>>,
}

impl InMemoryChatRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions currently holding at least one message.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

impl ChatRepository for InMemoryChatRepository {
    async fn append(
        &self,
        session_id: &str,
        text: &str,
        is_user: bool,
    ) -> Result<ChatMessage, RepositoryError> {
        let message = ChatMessage::new(session_id, text, is_user);
        self.sessions
            .entry(session_id.to_string())
            .or_default()
            .push(message.clone());
        Ok(message)
    }

    async fn read_all(&self, session_id: &str) -> Result<Vec<ChatMessage>, RepositoryError> {
        Ok(self
            .sessions
            .get(session_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default())
    }

    async fn clear(&self, session_id: &str) -> Result<(), RepositoryError> {
        self.sessions.remove(session_id);
        Ok(())
    }

    async fn count(&self, session_id: &str) -> Result<usize, RepositoryError> {
        Ok(self.sessions.get(session_id).map_or(0, |entry| entry.len()))
    }
}
