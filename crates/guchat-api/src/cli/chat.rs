//! Chat CLI commands: send, history, clear, export.
//!
//! The in-memory store starts empty on every invocation, so `history`,
//! `clear` and `export` are only useful against SQLite. A hint is printed
//! when they run on the memory backend.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;
use dialoguer::Confirm;

use guchat_core::chat::repository::ChatRepository;
use guchat_types::config::StorageBackend;

use crate::state::AppState;

/// Longest message preview shown in the history table.
const PREVIEW_CHARS: usize = 72;

/// Send one message and print the persona's reply.
///
/// # Examples
///
/// ```bash
/// guchat send s1 "Who created you?"
/// guchat send s1 "Teach me" --json
/// ```
pub async fn send_message(
    state: &AppState,
    session_id: &str,
    message: &str,
    json: bool,
) -> Result<()> {
    let reply = state
        .chat_service
        .send_message(session_id, message)
        .await
        .context("Failed to get a reply")?;

    if json {
        let out = serde_json::json!({
            "response": reply.text,
            "messageId": reply.id,
            "timestamp": reply.timestamp,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} {}",
        style(format!("{}:", state.chat_service.settings().persona_name))
            .red()
            .bold(),
        reply.text
    );
    println!();
    Ok(())
}

/// Print a session's history as a table (or JSON).
///
/// # Examples
///
/// ```bash
/// guchat history s1 --storage sqlite
/// guchat history s1 --json
/// ```
pub async fn show_history(state: &AppState, session_id: &str, json: bool) -> Result<()> {
    let history = state.chat_service.history(session_id).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "history": history }))?
        );
        return Ok(());
    }

    if history.is_empty() {
        println!();
        println!(
            "  {} No messages for session '{}'.",
            style("i").blue().bold(),
            style(session_id).cyan()
        );
        memory_hint(state);
        println!();
        return Ok(());
    }

    let persona = &state.chat_service.settings().persona_name;
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Time").fg(Color::White),
        Cell::new("Speaker").fg(Color::White),
        Cell::new("Message").fg(Color::White),
    ]);

    for msg in &history {
        let speaker = if msg.is_user {
            Cell::new("You").fg(Color::Cyan)
        } else {
            Cell::new(persona).fg(Color::Red)
        };
        table.add_row(vec![
            Cell::new(msg.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()).fg(Color::DarkGrey),
            speaker,
            Cell::new(preview(&msg.text)),
        ]);
    }

    println!();
    println!("  Session '{}'", style(session_id).cyan().bold());
    println!();
    println!("{table}");
    println!();
    println!(
        "  {} message{}",
        style(history.len()).bold(),
        if history.len() == 1 { "" } else { "s" }
    );
    println!();
    Ok(())
}

/// Clear a session's history, asking first unless `force` is set.
///
/// # Examples
///
/// ```bash
/// guchat clear s1
/// guchat clear s1 --force
/// ```
pub async fn clear_history(
    state: &AppState,
    session_id: &str,
    force: bool,
    json: bool,
) -> Result<()> {
    let count = state.chat_service.repo().count(session_id).await?;

    if !force && !json && count > 0 {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Delete {count} message{} from session '{session_id}'?",
                if count == 1 { "" } else { "s" }
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    state.chat_service.clear_history(session_id).await?;

    if json {
        println!("{}", serde_json::json!({ "success": true, "deleted": count }));
    } else {
        println!(
            "  {} Cleared {} message{} from '{}'",
            style("✓").green().bold(),
            count,
            if count == 1 { "" } else { "s" },
            style(session_id).cyan()
        );
    }
    Ok(())
}

/// Export a session as a plain-text transcript.
///
/// Without `output` the transcript goes to stdout. A directory as
/// `output` receives the suggested `fang-yuan-chat-<date>.txt` file.
///
/// # Examples
///
/// ```bash
/// guchat export s1
/// guchat export s1 --output ~/Downloads
/// ```
pub async fn export_history(
    state: &AppState,
    session_id: &str,
    output: Option<&Path>,
    json: bool,
) -> Result<()> {
    let Some(transcript) = state.chat_service.export_transcript(session_id).await? else {
        if json {
            println!("{}", serde_json::json!({ "error": "No conversation history to export" }));
        } else {
            println!(
                "  {} No conversation history to export for '{}'.",
                style("i").blue().bold(),
                style(session_id).cyan()
            );
            memory_hint(state);
        }
        return Ok(());
    };

    let Some(output) = output else {
        println!("{}", transcript.body);
        return Ok(());
    };

    let path = export_path(output, &transcript.filename);
    tokio::fs::write(&path, &transcript.body)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "path": path.display().to_string(),
                "messages": transcript.message_count,
            })
        );
    } else {
        println!(
            "  {} Exported {} messages to {}",
            style("✓").green().bold(),
            transcript.message_count,
            style(path.display()).cyan()
        );
    }
    Ok(())
}

fn export_path(output: &Path, filename: &str) -> PathBuf {
    if output.is_dir() {
        output.join(filename)
    } else {
        output.to_path_buf()
    }
}

fn preview(text: &str) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() > PREVIEW_CHARS {
        let cut: String = flat.chars().take(PREVIEW_CHARS - 3).collect();
        format!("{cut}...")
    } else {
        flat
    }
}

fn memory_hint(state: &AppState) {
    if state.chat_service.repo().backend() == StorageBackend::Memory {
        println!(
            "  {}",
            style("The memory store is per-process; use --storage sqlite to keep history.").dim()
        );
    }
}
