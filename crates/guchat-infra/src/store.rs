//! Storage backend selected at startup.

use std::path::Path;

use anyhow::Context;

use guchat_core::chat::repository::ChatRepository;
use guchat_types::chat::ChatMessage;
use guchat_types::config::{StorageBackend, StorageConfig};
use guchat_types::error::RepositoryError;

use crate::memory::chat::InMemoryChatRepository;
use crate::sqlite::chat::SqliteChatRepository;
use crate::sqlite::pool::{default_database_url, DatabasePool};

/// The message store behind the chat service.
///
/// `ChatRepository` is not object-safe, so the configured backend is held
/// as an enum and every call is delegated.
pub enum ChatStore {
    Memory(InMemoryChatRepository),
    Sqlite(SqliteChatRepository),
}

impl ChatStore {
    /// Open the backend named in `config`.
    ///
    /// SQLite creates `data_dir` when needed and runs migrations.
    pub async fn open(config: &StorageConfig, data_dir: &Path) -> anyhow::Result<Self> {
        match config.backend {
            StorageBackend::Memory => Ok(Self::Memory(InMemoryChatRepository::new())),
            StorageBackend::Sqlite => {
                let url = match &config.database_url {
                    Some(url) if is_in_memory_url(url) => anyhow::bail!(
                        "in-memory SQLite URL {url} is not supported; use backend = \"memory\" instead"
                    ),
                    Some(url) => url.clone(),
                    None => {
                        tokio::fs::create_dir_all(data_dir).await.with_context(|| {
                            format!("failed to create data directory {}", data_dir.display())
                        })?;
                        default_database_url(data_dir)
                    }
                };
                let pool = DatabasePool::new(&url)
                    .await
                    .with_context(|| format!("failed to open database {url}"))?;
                tracing::debug!(%url, "SQLite chat store ready");
                Ok(Self::Sqlite(SqliteChatRepository::new(pool)))
            }
        }
    }

    pub fn backend(&self) -> StorageBackend {
        match self {
            Self::Memory(_) => StorageBackend::Memory,
            Self::Sqlite(_) => StorageBackend::Sqlite,
        }
    }
}

/// The reader and writer pools would each open a separate in-memory
/// database, so reads would never see the migrated tables.
fn is_in_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

impl ChatRepository for ChatStore {
    async fn append(
        &self,
        session_id: &str,
        text: &str,
        is_user: bool,
    ) -> Result<ChatMessage, RepositoryError> {
        match self {
            Self::Memory(repo) => repo.append(session_id, text, is_user).await,
            Self::Sqlite(repo) => repo.append(session_id, text, is_user).await,
        }
    }

    async fn read_all(&self, session_id: &str) -> Result<Vec<ChatMessage>, RepositoryError> {
        match self {
            Self::Memory(repo) => repo.read_all(session_id).await,
            Self::Sqlite(repo) => repo.read_all(session_id).await,
        }
    }

    async fn clear(&self, session_id: &str) -> Result<(), RepositoryError> {
        match self {
            Self::Memory(repo) => repo.clear(session_id).await,
            Self::Sqlite(repo) => repo.clear(session_id).await,
        }
    }

    async fn count(&self, session_id: &str) -> Result<usize, RepositoryError> {
        match self {
            Self::Memory(repo) => repo.count(session_id).await,
            Self::Sqlite(repo) => repo.count(session_id).await,
        }
    }
}
