//! In-crate test doubles for the chat ports.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use guchat_types::chat::ChatMessage;
use guchat_types::error::RepositoryError;
use guchat_types::llm::{CompletionRequest, CompletionResponse, LlmError, StopReason, Usage};

use super::repository::ChatRepository;
use crate::llm::provider::LlmProvider;

/// Vec-backed repository with a switch to make writes fail.
#[derive(Default)]
pub struct VecRepository {
    sessions: Mutex<HashMap<String, Vec<ChatMessage>>>,
    fail_writes: bool,
}

impl VecRepository {
    /// A repository whose `append` always fails.
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Default::default()
        }
    }
}

impl ChatRepository for VecRepository {
    async fn append(
        &self,
        session_id: &str,
        text: &str,
        is_user: bool,
    ) -> Result<ChatMessage, RepositoryError> {
        if self.fail_writes {
            return Err(RepositoryError::Connection);
        }
        let msg = ChatMessage::new(session_id, text, is_user);
        self.sessions
            .lock()
            .unwrap()
            .entry(session_id.to_string())
            .or_default()
            .push(msg.clone());
        Ok(msg)
    }

    async fn read_all(&self, session_id: &str) -> Result<Vec<ChatMessage>, RepositoryError> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .get(session_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn clear(&self, session_id: &str) -> Result<(), RepositoryError> {
        self.sessions.lock().unwrap().remove(session_id);
        Ok(())
    }

    async fn count(&self, session_id: &str) -> Result<usize, RepositoryError> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .get(session_id)
            .map_or(0, Vec::len))
    }
}

/// Provider that replays scripted replies and records every request.
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    pub seen: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<Result<String, LlmError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-1"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.seen.lock().unwrap().push(request.clone());
        let next = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::Provider {
                message: "script exhausted".to_string(),
            }));
        next.map(|content| CompletionResponse {
            id: "scripted".to_string(),
            content,
            model: "scripted-1".to_string(),
            stop_reason: StopReason::EndTurn,
            usage: Usage::default(),
        })
    }
}
