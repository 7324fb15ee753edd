//! Utility modules supporting the search pipeline.
//!
//! - [`EmailSet`]: Insertion-ordered, case-insensitive set of addresses
//! - [`HttpClient`]: Shared reqwest client with timeout and default headers
//! - [`RetryConfig`]: Configuration for retry logic with exponential backoff
//! - [`with_retry`]: Execute an operation with automatic retry on transient errors
//!
//! # Retry with Backoff
//!
//! ```rust,no_run
//! use lead_email_finder::models::SearchQuery;
//! use lead_email_finder::sources::{MockSource, Source};
//! use lead_email_finder::utils::{with_retry, RetryConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let source = MockSource::new();
//! let query = SearchQuery::new("site:example.com email");
//! let config = RetryConfig::default().max_attempts(3);
//! let response = with_retry(config, || source.search(&query)).await?;
//! # Ok(())
//! # }
//! ```

mod dedup;
mod http;
mod retry;

pub use dedup::EmailSet;
pub use http::{HttpClient, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
pub use retry::{with_retry, RetryConfig, TransientError};
