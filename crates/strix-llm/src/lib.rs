//! LLM completion backend abstraction for Strix.
//!
//! Defines the [`LlmBackend`] trait used by the workflow engine for final
//! response generation, plus the message/request/response types and a
//! [`MockBackend`] for deterministic tests.

pub mod backend;
pub mod error;
pub mod openai;
pub mod types;

pub use backend::{CompletionStream, LlmBackend, MockBackend, SharedBackend, with_retry};
pub use error::{LlmError, Result, is_retryable};
pub use openai::{OpenAiBackend, OpenAiConfig};
pub use types::{CompletionRequest, CompletionResponse, Message, Role};
