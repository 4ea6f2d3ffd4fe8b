//! Error types for session coordination.

use thiserror::Error;

/// Result type alias using the session error type.
pub type Result<T> = std::result::Result<T, SessionError>;

/// Error type for session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Conversation storage failed.
    #[error("Store error: {0}")]
    Store(String),

    /// Unknown conversation id.
    #[error("Conversation not found: {0}")]
    ConversationNotFound(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SessionError {
    /// Create a store error.
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }
}
