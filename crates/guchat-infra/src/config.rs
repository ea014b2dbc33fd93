//! Configuration loading for gu-chat.
//!
//! Reads `config.toml` from the data directory (`~/.guchat/` by default)
//! into [`GlobalConfig`], falling back to defaults when the file is missing
//! or malformed, and turns it into the [`ChatSettings`] the service runs on.

use std::path::{Path, PathBuf};

use guchat_core::chat::prompt::DEFAULT_PERSONA_PROMPT;
use guchat_core::chat::service::ChatSettings;
use guchat_types::config::{GlobalConfig, PersonaConfig};

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `GUCHAT_DATA_DIR` environment variable
/// 2. `~/.guchat`
/// 3. `.guchat` in the current directory
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("GUCHAT_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".guchat");
    }

    PathBuf::from(".guchat")
}

/// Load configuration from `{data_dir}/config.toml`.
///
/// - Missing file: [`GlobalConfig::default()`].
/// - Unreadable or unparsable file: logs a warning and returns the default.
pub async fn load_global_config(data_dir: &Path) -> GlobalConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
    };

    match toml::from_str::<GlobalConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            GlobalConfig::default()
        }
    }
}

/// Resolve the persona's system prompt.
///
/// Inline `system_prompt` wins, then `system_prompt_file` (relative paths
/// are taken from `data_dir`), then the built-in persona. A file that
/// cannot be read is logged and skipped.
pub async fn resolve_system_prompt(persona: &PersonaConfig, data_dir: &Path) -> String {
    if let Some(prompt) = persona.system_prompt.as_deref().filter(|p| !p.trim().is_empty()) {
        return prompt.to_string();
    }

    if let Some(file) = &persona.system_prompt_file {
        let path = if file.is_absolute() {
            file.clone()
        } else {
            data_dir.join(file)
        };
        match tokio::fs::read_to_string(&path).await {
            Ok(content) if !content.trim().is_empty() => return content,
            Ok(_) => {
                tracing::warn!("{} is empty, using the built-in persona", path.display());
            }
            Err(err) => {
                tracing::warn!(
                    "Failed to read {}: {err}, using the built-in persona",
                    path.display()
                );
            }
        }
    }

    DEFAULT_PERSONA_PROMPT.to_string()
}

/// Build the chat service settings from the loaded configuration.
pub async fn chat_settings(config: &GlobalConfig, data_dir: &Path) -> ChatSettings {
    ChatSettings {
        persona_name: config.persona.name.clone(),
        system_prompt: resolve_system_prompt(&config.persona, data_dir).await,
        context_window: config.context_window,
        // The provider already carries the configured model.
        model: String::new(),
        temperature: config.provider.temperature,
        max_output_tokens: config.provider.max_output_tokens,
    }
}
