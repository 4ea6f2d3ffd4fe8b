//! Web search capability for Strix.
//!
//! Defines the [`SearchBackend`] trait consumed by the agent's search
//! tool and workflow engine, a DuckDuckGo HTML scraping client, and a
//! [`MockSearch`] for tests.

pub mod client;
pub mod error;

pub use client::{
    DuckDuckGoClient, DuckDuckGoConfig, MockSearch, SearchBackend, SearchResult, SharedSearch,
};
pub use error::{Result, SearchError};
