//! LLM provider implementations.
//!
//! Concrete [`LlmProvider`](guchat_core::llm::provider::LlmProvider) impls
//! plus [`create_provider`], which builds the configured one, and
//! [`resolve_api_key`], which reads its key from the environment.

pub mod gemini;
pub mod openai_compat;

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use guchat_core::llm::box_provider::BoxLlmProvider;
use guchat_types::config::ProviderConfig;
use guchat_types::llm::{LlmError, ProviderType};

use self::gemini::GeminiProvider;
use self::openai_compat::OpenAiCompatibleProvider;

/// Environment variables checked for each provider's key, in order.
pub fn api_key_env_vars(provider_type: ProviderType) -> &'static [&'static str] {
    match provider_type {
        ProviderType::Gemini => &["GEMINI_API_KEY", "GOOGLE_API_KEY"],
        ProviderType::OpenAiCompatible => &["OPENAI_API_KEY"],
    }
}

/// Read the provider's API key from the environment.
///
/// Empty values are treated as unset.
pub fn resolve_api_key(provider_type: ProviderType) -> Option<SecretString> {
    api_key_env_vars(provider_type)
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.trim().is_empty())
        .map(SecretString::from)
}

/// Create a [`BoxLlmProvider`] from a [`ProviderConfig`].
///
/// A missing key does not fail here: the server still starts and each
/// chat request fails with [`LlmError::AuthenticationFailed`].
pub fn create_provider(
    config: &ProviderConfig,
    api_key: Option<SecretString>,
) -> Result<BoxLlmProvider, LlmError> {
    if api_key.is_none() {
        tracing::warn!(
            provider = %config.provider_type,
            env = ?api_key_env_vars(config.provider_type),
            "No API key configured; chat requests will fail until one is set"
        );
    }

    match config.provider_type {
        ProviderType::Gemini => {
            let mut provider = GeminiProvider::new(
                api_key,
                config.model.clone(),
                Duration::from_secs(config.timeout_secs),
            )?;
            if let Some(base_url) = config.base_url.as_deref() {
                provider = provider.with_base_url(base_url);
            }
            Ok(BoxLlmProvider::new(provider))
        }
        ProviderType::OpenAiCompatible => {
            let key = api_key
                .as_ref()
                .map(|k| k.expose_secret().to_string())
                .unwrap_or_default();
            let oai_config = match config.base_url.as_deref() {
                Some(base_url) => openai_compat::config::custom(base_url, &key, &config.model),
                None => openai_compat::config::openai_defaults(&key, &config.model),
            };
            let provider = OpenAiCompatibleProvider::new(
                oai_config.with_timeout(Duration::from_secs(config.timeout_secs)),
            )?;
            Ok(BoxLlmProvider::new(provider))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_env_vars() {
        assert_eq!(
            api_key_env_vars(ProviderType::Gemini),
            &["GEMINI_API_KEY", "GOOGLE_API_KEY"]
        );
        assert_eq!(
            api_key_env_vars(ProviderType::OpenAiCompatible),
            &["OPENAI_API_KEY"]
        );
    }

    #[test]
    fn test_create_provider_gemini_default() {
        let config = ProviderConfig::default();
        let provider =
            create_provider(&config, Some(SecretString::from("gemini-key".to_string()))).unwrap();
        assert_eq!(provider.name(), "gemini");
        assert_eq!(provider.model(), "gemini-2.5-flash");
    }

    #[test]
    fn test_create_provider_without_key_still_builds() {
        let config = ProviderConfig::default();
        let provider = create_provider(&config, None).unwrap();
        assert_eq!(provider.name(), "gemini");
    }

    #[test]
    fn test_create_provider_openai_compatible() {
        let config = ProviderConfig {
            provider_type: ProviderType::OpenAiCompatible,
            model: "gpt-4o-mini".to_string(),
            ..ProviderConfig::default()
        };
        let provider =
            create_provider(&config, Some(SecretString::from("sk-test".to_string()))).unwrap();
        assert_eq!(provider.name(), "openai");
        assert_eq!(provider.model(), "gpt-4o-mini");
    }

    #[test]
    fn test_create_provider_openai_compatible_with_base_url() {
        let config = ProviderConfig {
            provider_type: ProviderType::OpenAiCompatible,
            model: "llama3".to_string(),
            base_url: Some("http://localhost:11434/v1".to_string()),
            ..ProviderConfig::default()
        };
        let provider = create_provider(&config, None).unwrap();
        assert_eq!(provider.name(), "openai_compatible");
    }

    #[tokio::test]
    async fn test_keyless_gemini_fails_at_call_time() {
        use guchat_types::llm::{CompletionRequest, Message, MessageRole};

        let provider = create_provider(&ProviderConfig::default(), None).unwrap();
        let request = CompletionRequest {
            model: String::new(),
            messages: vec![Message {
                role: MessageRole::User,
                content: "Hi".to_string(),
            }],
            system: None,
            max_tokens: 10,
            temperature: None,
        };
        let err = provider.complete(&request).await.unwrap_err();
        assert!(matches!(err, LlmError::AuthenticationFailed));
    }

    #[tokio::test]
    async fn test_openai_compatible_honors_configured_timeout() {
        use guchat_types::llm::{CompletionRequest, Message, MessageRole};

        let app = axum::Router::new().fallback(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            "too late"
        });
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let config = ProviderConfig {
            provider_type: ProviderType::OpenAiCompatible,
            model: "llama3".to_string(),
            base_url: Some(format!("http://{addr}/v1")),
            timeout_secs: 1,
            ..ProviderConfig::default()
        };
        let provider = create_provider(&config, None).unwrap();
        let request = CompletionRequest {
            model: String::new(),
            messages: vec![Message {
                role: MessageRole::User,
                content: "Hi".to_string(),
            }],
            system: None,
            max_tokens: 10,
            temperature: None,
        };

        let started = std::time::Instant::now();
        let err = provider.complete(&request).await.unwrap_err();
        assert!(matches!(err, LlmError::Provider { .. }));
        assert!(started.elapsed() < Duration::from_secs(4));
    }
}
