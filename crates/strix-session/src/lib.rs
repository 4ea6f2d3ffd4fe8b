//! Session coordination for Strix.
//!
//! Provides the [`ConversationStore`] persistence boundary, the typed
//! [`SessionEvent`] stream, and the [`ChatSessionCoordinator`] that wires
//! a conversation store to the agent's workflow engine.

pub mod coordinator;
pub mod error;
pub mod events;
pub mod store;

pub use coordinator::ChatSessionCoordinator;
pub use error::{Result, SessionError};
pub use events::SessionEvent;
pub use store::{ConversationStore, MemoryStore, SharedStore, StoredMessage};
