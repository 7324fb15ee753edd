//! Core data models for search targets, backend responses and run results.

mod result;
mod search;
mod target;

pub use result::RunResult;
pub use search::{SearchHit, SearchQuery, SearchResponse, SearchResult, DEFAULT_MAX_PAGES};
pub use target::SearchTarget;
