use thiserror::Error;

use crate::llm::LlmError;

/// Errors from repository operations (used by trait definitions in guchat-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),
}

/// Errors surfaced by the chat service.
#[derive(Debug, Error)]
pub enum ChatError {
    /// A required request field was absent or empty.
    #[error("validation error: {0}")]
    Validation(String),

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),

    #[error("generation error: {0}")]
    Generation(#[from] LlmError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }

    #[test]
    fn test_chat_error_from_repository() {
        let err: ChatError = RepositoryError::Connection.into();
        assert!(matches!(err, ChatError::Storage(RepositoryError::Connection)));
        assert_eq!(err.to_string(), "storage error: database connection error");
    }

    #[test]
    fn test_chat_error_from_llm() {
        let err: ChatError = LlmError::AuthenticationFailed.into();
        assert!(matches!(err, ChatError::Generation(_)));
    }
}
