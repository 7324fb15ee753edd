//! # Lead Email Finder
//!
//! Discovers plausible business email addresses for a company by sending
//! targeted queries to a SearXNG search backend, scanning the returned text
//! for email-shaped substrings and filtering them against a blacklist and the
//! company's domain.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (SearchTarget, SearchResponse, RunResult)
//! - [`finder`]: The pipeline: domain resolution, query planning, extraction, filtering, aggregation
//! - [`sources`]: Search backend plugins behind the [`Source`] trait
//! - [`utils`]: HTTP client, retry and deduplication helpers
//! - [`config`]: Configuration management
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use lead_email_finder::{EmailFinder, SearchTarget};
//! use lead_email_finder::sources::SearxngSource;
//! use lead_email_finder::utils::HttpClient;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let source = SearxngSource::new("http://localhost:8080", HttpClient::new()?)?;
//! let finder = EmailFinder::new(Arc::new(source));
//!
//! let target = SearchTarget::resolve("example.com", Some("Jane Doe"), None);
//! let result = finder.find(&target).await;
//! println!("{:?}", result.found_emails);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod finder;
pub mod models;
pub mod sources;
pub mod utils;

// Re-export commonly used types
pub use finder::{EmailFinder, FinderError};
pub use models::{RunResult, SearchTarget};
pub use sources::{Source, SourceError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
