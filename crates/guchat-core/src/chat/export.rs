//! Plain-text transcript export.
//!
//! User turns are labelled `You`, assistant turns with the persona name,
//! and turns are separated by a blank line.

use chrono::NaiveDate;

use guchat_types::chat::ChatMessage;

/// Label for the user's turns in an exported transcript.
pub const EXPORT_USER_LABEL: &str = "You";

/// A rendered session transcript ready to be written or downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub session_id: String,
    pub filename: String,
    pub body: String,
    pub message_count: usize,
}

/// Render messages as `"<Speaker>: <text>"` blocks joined by blank lines.
pub fn render_transcript(history: &[ChatMessage], persona_name: &str) -> String {
    history
        .iter()
        .map(|m| {
            let speaker = if m.is_user { EXPORT_USER_LABEL } else { persona_name };
            format!("{speaker}: {}", m.text)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Download filename, e.g. `fang-yuan-chat-2024-05-01.txt`.
pub fn export_filename(persona_name: &str, date: NaiveDate) -> String {
    format!("{}-chat-{}.txt", slugify(persona_name), date.format("%Y-%m-%d"))
}

fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-').to_string();
    if slug.is_empty() { "session".to_string() } else { slug }
}
