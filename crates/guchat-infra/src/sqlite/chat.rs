//! SQLite chat repository implementation.
//!
//! Implements `ChatRepository` from `guchat-core` using sqlx with split
//! read/write pools: raw queries, a private Row struct, reader for SELECTs,
//! writer for INSERT/DELETE.

use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use guchat_core::chat::repository::ChatRepository;
use guchat_types::chat::ChatMessage;
use guchat_types::error::RepositoryError;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `ChatRepository`.
pub struct SqliteChatRepository {
    pool: DatabasePool,
}

impl SqliteChatRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain ChatMessage.
struct ChatMessageRow {
    id: String,
    session_id: String,
    text: String,
    is_user: bool,
    created_at: String,
}

impl ChatMessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            session_id: row.try_get("session_id")?,
            text: row.try_get("text")?,
            is_user: row.try_get("is_user")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_message(self) -> Result<ChatMessage, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid message id: {e}")))?;
        let timestamp = parse_datetime(&self.created_at)?;

        Ok(ChatMessage {
            id,
            session_id: self.session_id,
            text: self.text,
            is_user: self.is_user,
            timestamp,
        })
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

/// Pool exhaustion and I/O failures are connection errors; anything else
/// is reported as a query error.
fn map_sqlx_error(e: sqlx::Error) -> RepositoryError {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            RepositoryError::Connection
        }
        other => RepositoryError::Query(other.to_string()),
    }
}

impl ChatRepository for SqliteChatRepository {
    async fn append(
        &self,
        session_id: &str,
        text: &str,
        is_user: bool,
    ) -> Result<ChatMessage, RepositoryError> {
        let message = ChatMessage::new(session_id, text, is_user);

        sqlx::query(
            r#"INSERT INTO chat_messages (id, session_id, text, is_user, created_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(message.id.to_string())
        .bind(&message.session_id)
        .bind(&message.text)
        .bind(message.is_user)
        .bind(message.timestamp.to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx_error)?;

        Ok(message)
    }

    async fn read_all(&self, session_id: &str) -> Result<Vec<ChatMessage>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, session_id, text, is_user, created_at FROM chat_messages WHERE session_id = ? ORDER BY seq ASC",
        )
        .bind(session_id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(map_sqlx_error)?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            let msg_row =
                ChatMessageRow::from_row(row).map_err(map_sqlx_error)?;
            messages.push(msg_row.into_message()?);
        }

        Ok(messages)
    }

    async fn clear(&self, session_id: &str) -> Result<(), RepositoryError> {
        // Zero rows affected is fine: clearing an unknown session succeeds.
        sqlx::query("DELETE FROM chat_messages WHERE session_id = ?")
            .bind(session_id)
            .execute(&self.pool.writer)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn count(&self, session_id: &str) -> Result<usize, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) as cnt FROM chat_messages WHERE session_id = ?")
            .bind(session_id)
            .fetch_one(&self.pool.reader)
            .await
            .map_err(map_sqlx_error)?;

        let count: i64 = row
            .try_get("cnt")
            .map_err(map_sqlx_error)?;

        Ok(count as usize)
    }
}
