//! Configuration and well-known defaults for OpenAI-compatible providers.

use std::time::Duration;

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for an OpenAI-compatible LLM provider.
///
/// Used to construct an [`super::OpenAiCompatibleProvider`].
pub struct OpenAiCompatConfig {
    /// Human-readable provider name (e.g., "openai").
    pub provider_name: String,
    /// Base URL for the API (e.g., "https://api.openai.com/v1").
    pub base_url: String,
    /// API key; empty when none was configured.
    pub api_key: String,
    pub model: String,
    /// Whole-request timeout for the HTTP client.
    pub timeout: Duration,
    /// Send requests even without a key (local servers accept anything).
    pub allow_keyless: bool,
}

impl OpenAiCompatConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// OpenAI default configuration.
///
/// Base URL: `https://api.openai.com/v1`
pub fn openai_defaults(api_key: &str, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "openai".into(),
        base_url: "https://api.openai.com/v1".into(),
        api_key: api_key.into(),
        model: model.into(),
        timeout: DEFAULT_TIMEOUT,
        allow_keyless: false,
    }
}

/// Any other endpoint speaking the chat completions protocol
/// (local servers, proxies).
pub fn custom(base_url: &str, api_key: &str, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "openai_compatible".into(),
        base_url: base_url.trim_end_matches('/').into(),
        api_key: api_key.into(),
        model: model.into(),
        timeout: DEFAULT_TIMEOUT,
        allow_keyless: true,
    }
}
