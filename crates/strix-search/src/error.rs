//! Error types for the search crate.

use thiserror::Error;

/// Result type alias using the search error type.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Error type for search operations.
#[derive(Debug, Error)]
pub enum SearchError {
    /// HTTP request failed.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned an unusable page.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Client configuration problem.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SearchError {
    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}
