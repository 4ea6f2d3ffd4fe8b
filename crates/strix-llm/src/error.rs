//! Error types for the LLM crate.

use thiserror::Error;

/// Result type alias using the LLM error type.
pub type Result<T> = std::result::Result<T, LlmError>;

/// Error type for LLM backend operations.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Network-level failure talking to the provider.
    #[error("Network error: {0}")]
    Network(String),

    /// The backend rejected the request or returned a malformed response.
    #[error("Backend error: {0}")]
    Backend(String),

    /// Backend configuration problem (missing key, bad URL).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LlmError {
    /// Create a network error.
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a backend error.
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

/// Whether an error is worth retrying.
///
/// Only transient network failures are retryable; everything else is
/// returned to the caller immediately.
pub fn is_retryable(err: &LlmError) -> bool {
    matches!(err, LlmError::Network(_))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_errors_are_retryable() {
        assert!(is_retryable(&LlmError::network("connection reset")));
        assert!(!is_retryable(&LlmError::backend("invalid model")));
        assert!(!is_retryable(&LlmError::Config("no api key".into())));
    }

    #[test]
    fn test_error_display() {
        let err = LlmError::backend("model overloaded");
        assert!(err.to_string().contains("Backend error"));
        assert!(err.to_string().contains("model overloaded"));

        let err = LlmError::Config("no api key".into());
        assert!(err.to_string().contains("Configuration error"));
    }
}
