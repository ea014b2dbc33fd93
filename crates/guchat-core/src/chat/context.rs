//! Trailing context window for prompt construction.
//!
//! The generator only sees the last few turns of a session, rendered as
//! `"<Speaker>: <text>"` lines. There is no summarization and no token
//! accounting: the window is a fixed message count.

use guchat_types::chat::ChatMessage;

/// Default number of trailing messages used as context.
pub const DEFAULT_CONTEXT_WINDOW: usize = 6;

/// Speaker label for user turns.
pub const USER_LABEL: &str = "User";

/// Selects and formats the trailing slice of a session's history.
#[derive(Debug, Clone)]
pub struct ContextWindow {
    size: usize,
    assistant_label: String,
}

impl ContextWindow {
    /// Create a window of `size` messages labelling assistant turns with
    /// `assistant_label`.
    pub fn new(size: usize, assistant_label: impl Into<String>) -> Self {
        Self {
            size,
            assistant_label: assistant_label.into(),
        }
    }

    /// Label used for a message's author.
    pub fn speaker<'a>(&'a self, message: &ChatMessage) -> &'a str {
        if message.is_user {
            USER_LABEL
        } else {
            &self.assistant_label
        }
    }

    /// The last `size` messages of `history`, or all of them if shorter.
    pub fn select<'h>(&self, history: &'h [ChatMessage]) -> &'h [ChatMessage] {
        let start = history.len().saturating_sub(self.size);
        &history[start..]
    }

    /// Format the selected window as `"<Speaker>: <text>"` lines.
    pub fn lines(&self, history: &[ChatMessage]) -> Vec<String> {
        self.select(history)
            .iter()
            .map(|m| format!("{}: {}", self.speaker(m), m.text))
            .collect()
    }
}

impl Default for ContextWindow {
    fn default() -> Self {
        Self::new(DEFAULT_CONTEXT_WINDOW, "Fang Yuan")
    }
}
