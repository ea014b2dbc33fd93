//! Application state wiring the chat service together.
//!
//! AppState holds the concrete service used by both CLI and REST API.
//! `ChatService` is generic over its repository; here it is pinned to
//! [`ChatStore`], whose variant is picked from configuration.

use std::sync::Arc;

use guchat_core::chat::service::ChatService;
use guchat_infra::config::{chat_settings, load_global_config, resolve_data_dir};
use guchat_infra::llm::{create_provider, resolve_api_key};
use guchat_infra::store::ChatStore;
use guchat_types::config::StorageBackend;

pub type ConcreteChatService = ChatService<ChatStore>;

/// Command-line values that take priority over `config.toml`.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub storage: Option<StorageBackend>,
    pub database_url: Option<String>,
}

/// Shared application state.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
}

impl AppState {
    /// Load configuration, open the store, build the provider.
    pub async fn init(overrides: &Overrides) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        let mut config = load_global_config(&data_dir).await;

        if let Some(backend) = overrides.storage {
            config.storage.backend = backend;
        }
        if let Some(url) = &overrides.database_url {
            config.storage.database_url = Some(url.clone());
        }

        let store = ChatStore::open(&config.storage, &data_dir).await?;
        let provider = create_provider(
            &config.provider,
            resolve_api_key(config.provider.provider_type),
        )?;
        let settings = chat_settings(&config, &data_dir).await;

        tracing::info!(
            storage = %store.backend(),
            provider = provider.name(),
            model = provider.model(),
            persona = %settings.persona_name,
            "Application state initialized"
        );

        let chat_service = ChatService::new(store, provider, settings);

        Ok(Self {
            chat_service: Arc::new(chat_service),
        })
    }
}
