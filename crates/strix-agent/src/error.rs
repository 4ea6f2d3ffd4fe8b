//! Error types for the agent crate.
//!
//! Expected failure modes in this crate travel as data: tools encode
//! failures in [`crate::types::ToolResult`] and workflow steps in
//! [`crate::types::WorkflowStep`]. `AgentError` covers only configuration
//! and lookup faults.

use thiserror::Error;

/// Result type alias using the agent error type.
pub type Result<T> = std::result::Result<T, AgentError>;

/// Error type for agent operations.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Tool not found in registry.
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AgentError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AgentError::config("no search backend");
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("no search backend"));
    }

    #[test]
    fn test_tool_not_found() {
        let err = AgentError::ToolNotFound("unknown_tool".to_string());
        assert!(err.to_string().contains("Tool not found"));
    }
}
