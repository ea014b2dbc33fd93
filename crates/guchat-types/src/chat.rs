//! Chat message types for gu-chat.
//!
//! A session is not a stored entity: it is the opaque, client-chosen string
//! that groups messages. Only messages are persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single message within a chat session.
///
/// Immutable once created. Serialized with the camelCase field names the
/// web client expects (`sessionId`, `isUser`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: Uuid,
    pub session_id: String,
    pub text: String,
    pub is_user: bool,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a new message with a fresh time-sortable id and the current time.
    pub fn new(session_id: impl Into<String>, text: impl Into<String>, is_user: bool) -> Self {
        Self {
            id: Uuid::now_v7(),
            session_id: session_id.into(),
            text: text.into(),
            is_user,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_message_has_fresh_ids() {
        let a = ChatMessage::new("s1", "Hi", true);
        let b = ChatMessage::new("s1", "Hi", true);
        assert_ne!(a.id, b.id);
        assert_eq!(a.session_id, "s1");
        assert!(a.is_user);
        assert!(!ChatMessage::new("s1", "Greetings, mortal.", false).is_user);
    }

    #[test]
    fn test_serializes_camel_case() {
        let msg = ChatMessage::new("abc", "hello", true);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["sessionId"], "abc");
        assert_eq!(json["isUser"], true);
        assert_eq!(json["text"], "hello");
        assert!(json["timestamp"].is_string());
        assert!(json.get("session_id").is_none());
    }
}
