//! Search backend plugins with a trait-based architecture.
//!
//! This module defines the [`Source`] trait that every search backend implements.
//! The pipeline only needs free text per query, so any backend that can return
//! result titles and snippets for a query string can be plugged in.
//!
//! Two implementations ship with the crate:
//!
//! - [`SearxngSource`] - queries a SearXNG instance through its JSON API
//! - [`MockSource`] - returns canned responses, used by tests and examples
//!
//! # Example
//!
//! ```rust,no_run
//! use lead_email_finder::models::SearchQuery;
//! use lead_email_finder::sources::{SearxngSource, Source};
//! use lead_email_finder::utils::HttpClient;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let source = SearxngSource::new("http://localhost:8080", HttpClient::new()?)?;
//! let response = source.search(&SearchQuery::new("site:example.com email")).await?;
//! println!("{}", response.text_blob());
//! # Ok(())
//! # }
//! ```

pub mod mock;
mod searxng;

pub use mock::MockSource;
pub use searxng::SearxngSource;

use crate::models::{SearchQuery, SearchResponse};
use async_trait::async_trait;

/// The Source trait defines the interface for all search backends.
///
/// # Implementing a New Source
///
/// 1. Create a new struct that implements `Source`
/// 2. Implement `id`, `name` and `search`
/// 3. Hand it to [`EmailFinder::new`](crate::finder::EmailFinder::new) as an `Arc<dyn Source>`
#[async_trait]
pub trait Source: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this source (e.g., "searxng")
    fn id(&self) -> &str;

    /// Human-readable name of this source
    fn name(&self) -> &str;

    /// Run one query and return every hit the backend produced for it
    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, SourceError>;
}

/// Errors that can occur when interacting with a source
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SourceError {
    /// Network or HTTP transport error
    #[error("Network error: {0}")]
    Network(String),

    /// The request exceeded its timeout
    #[error("Request timed out")]
    Timeout,

    /// The backend answered with a non-success status
    #[error("Backend returned status {0}")]
    Status(u16),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimit,

    /// Malformed response body
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid request parameters or source configuration
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Other error
    #[error("Error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SourceError::Timeout
        } else if err.is_decode() {
            SourceError::Parse(err.to_string())
        } else if let Some(status) = err.status() {
            SourceError::Status(status.as_u16())
        } else {
            SourceError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(format!("JSON: {}", err))
    }
}
