//! Chat service orchestrating the request pipeline behind the chat endpoint.
//!
//! One call to [`ChatService::send_message`] runs:
//! persist user turn -> build context -> generate -> persist reply.
//! A generation failure leaves the user turn stored; nothing is rolled back
//! and nothing is retried.

use chrono::Utc;
use tracing::{debug, error, info, warn};

use guchat_types::chat::ChatMessage;
use guchat_types::error::ChatError;
use guchat_types::llm::{CompletionRequest, LlmError, Message, MessageRole};

use super::context::{ContextWindow, DEFAULT_CONTEXT_WINDOW};
use super::export::{export_filename, render_transcript, Transcript};
use super::prompt::{build_user_prompt, DEFAULT_PERSONA_PROMPT};
use super::repository::ChatRepository;
use crate::llm::box_provider::BoxLlmProvider;

/// Reply stored when the generator answers with no text.
pub const EMPTY_REPLY_FALLBACK: &str = "Refinement requires clarity. Speak with purpose.";

/// Generation and persona settings for a [`ChatService`].
#[derive(Debug, Clone)]
pub struct ChatSettings {
    /// Speaker label for assistant turns.
    pub persona_name: String,
    pub system_prompt: String,
    pub context_window: usize,
    /// Model override; empty uses the provider's configured model.
    pub model: String,
    pub temperature: f64,
    pub max_output_tokens: u32,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            persona_name: "Fang Yuan".to_string(),
            system_prompt: DEFAULT_PERSONA_PROMPT.to_string(),
            context_window: DEFAULT_CONTEXT_WINDOW,
            model: String::new(),
            temperature: 0.8,
            max_output_tokens: 300,
        }
    }
}

/// Orchestrates message persistence and reply generation.
///
/// Generic over `ChatRepository` so guchat-core never depends on
/// guchat-infra; the provider is type-erased so it can be picked at runtime.
pub struct ChatService<R: ChatRepository> {
    repo: R,
    provider: BoxLlmProvider,
    settings: ChatSettings,
    window: ContextWindow,
}

impl<R: ChatRepository> ChatService<R> {
    /// Create a new chat service.
    pub fn new(repo: R, provider: BoxLlmProvider, settings: ChatSettings) -> Self {
        let window = ContextWindow::new(settings.context_window, settings.persona_name.clone());
        Self {
            repo,
            provider,
            settings,
            window,
        }
    }

    /// Access the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn provider(&self) -> &BoxLlmProvider {
        &self.provider
    }

    pub fn settings(&self) -> &ChatSettings {
        &self.settings
    }

    /// Handle one chat turn and return the stored assistant message.
    pub async fn send_message(
        &self,
        session_id: &str,
        message: &str,
    ) -> Result<ChatMessage, ChatError> {
        if session_id.is_empty() || message.is_empty() {
            return Err(ChatError::Validation(
                "Session ID and message are required".to_string(),
            ));
        }

        let user_msg = self.repo.append(session_id, message, true).await?;
        debug!(session_id, message_id = %user_msg.id, "User message saved");

        let context = self.context_for(session_id, &user_msg).await?;
        let request = self.build_request(&context, message);

        let (reply, output_tokens) = match self.provider.complete(&request).await {
            Ok(response) if !response.content.trim().is_empty() => {
                (response.content, response.usage.output_tokens)
            }
            Ok(_) | Err(LlmError::EmptyResponse) => {
                warn!(session_id, "Generator returned no text, using fallback reply");
                (EMPTY_REPLY_FALLBACK.to_string(), 0)
            }
            Err(e) => {
                error!(
                    session_id,
                    provider = self.provider.name(),
                    error = %e,
                    "Generation failed; user message kept"
                );
                return Err(ChatError::Generation(e));
            }
        };

        let saved = self.repo.append(session_id, &reply, false).await?;
        info!(
            session_id,
            message_id = %saved.id,
            context_lines = context.len(),
            output_tokens,
            "Reply saved"
        );
        Ok(saved)
    }

    /// Context lines for the generator.
    ///
    /// The message just stored for this turn is excluded (matched by id) so
    /// it is not sent twice; it already travels as the current message.
    async fn context_for(
        &self,
        session_id: &str,
        current: &ChatMessage,
    ) -> Result<Vec<String>, ChatError> {
        let mut history = self.repo.read_all(session_id).await?;
        history.retain(|m| m.id != current.id);
        Ok(self.window.lines(&history))
    }

    fn build_request(&self, context: &[String], message: &str) -> CompletionRequest {
        CompletionRequest {
            model: self.settings.model.clone(),
            messages: vec![Message {
                role: MessageRole::User,
                content: build_user_prompt(context, message),
            }],
            system: Some(self.settings.system_prompt.clone()),
            max_tokens: self.settings.max_output_tokens,
            temperature: Some(self.settings.temperature),
        }
    }

    /// Full ordered history for a session (empty if unknown).
    pub async fn history(&self, session_id: &str) -> Result<Vec<ChatMessage>, ChatError> {
        Ok(self.repo.read_all(session_id).await?)
    }

    /// Remove all messages for a session. Succeeds for unknown sessions.
    pub async fn clear_history(&self, session_id: &str) -> Result<(), ChatError> {
        self.repo.clear(session_id).await?;
        info!(session_id, "History cleared");
        Ok(())
    }

    /// Render a session as a plain-text transcript.
    ///
    /// Returns `None` when the session has no messages.
    pub async fn export_transcript(
        &self,
        session_id: &str,
    ) -> Result<Option<Transcript>, ChatError> {
        let history = self.repo.read_all(session_id).await?;
        if history.is_empty() {
            return Ok(None);
        }
        Ok(Some(Transcript {
            session_id: session_id.to_string(),
            filename: export_filename(&self.settings.persona_name, Utc::now().date_naive()),
            body: render_transcript(&history, &self.settings.persona_name),
            message_count: history.len(),
        }))
    }
}
