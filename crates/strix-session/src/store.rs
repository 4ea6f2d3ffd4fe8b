//! Conversation persistence boundary.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use strix_llm::Role;

use crate::error::Result;

/// A persisted conversation turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredMessage {
    /// Store-assigned message id.
    pub id: String,
    /// Who authored the turn.
    pub role: Role,
    /// The message text.
    pub content: String,
    /// When the turn was persisted.
    pub timestamp: DateTime<Utc>,
}

/// Persistence sink and source for conversation turns.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Append a turn, returning the new message id.
    async fn append(&self, conversation_id: &str, role: Role, content: &str) -> Result<String>;

    /// Full history for a conversation, oldest first. Unknown
    /// conversations yield an empty history.
    async fn history(&self, conversation_id: &str) -> Result<Vec<StoredMessage>>;
}

/// Shared handle to a conversation store.
pub type SharedStore = Arc<dyn ConversationStore>;

/// In-memory store, suitable for tests and single-process use.
#[derive(Default)]
pub struct MemoryStore {
    conversations: Mutex<HashMap<String, Vec<StoredMessage>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of turns stored for a conversation.
    pub fn len(&self, conversation_id: &str) -> usize {
        self.conversations
            .lock()
            .get(conversation_id)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

#[async_trait]
impl ConversationStore for MemoryStore {
    async fn append(&self, conversation_id: &str, role: Role, content: &str) -> Result<String> {
        let id = format!("msg_{}", Uuid::new_v4().simple());
        let message = StoredMessage {
            id: id.clone(),
            role,
            content: content.to_string(),
            timestamp: Utc::now(),
        };
        self.conversations
            .lock()
            .entry(conversation_id.to_string())
            .or_default()
            .push(message);
        Ok(id)
    }

    async fn history(&self, conversation_id: &str) -> Result<Vec<StoredMessage>> {
        Ok(self
            .conversations
            .lock()
            .get(conversation_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_append_and_history() {
        let store = MemoryStore::new();

        let id1 = store.append("conv_1", Role::User, "hello").await.unwrap();
        let id2 = store
            .append("conv_1", Role::Assistant, "hi there")
            .await
            .unwrap();
        assert_ne!(id1, id2);

        let history = store.history("conv_1").await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, Role::User);
        assert_eq!(history[1].content, "hi there");
    }

    #[tokio::test]
    async fn test_unknown_conversation_is_empty() {
        let store = MemoryStore::new();
        let history = store.history("missing").await.unwrap();
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn test_conversations_are_isolated() {
        let store = MemoryStore::new();
        store.append("a", Role::User, "first").await.unwrap();
        store.append("b", Role::User, "second").await.unwrap();

        assert_eq!(store.len("a"), 1);
        assert_eq!(store.len("b"), 1);
        assert_eq!(store.history("a").await.unwrap()[0].content, "first");
    }
}
