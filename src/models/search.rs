//! Search request and response models.

use serde::{Deserialize, Serialize};

/// Default number of result pages fetched per query
pub const DEFAULT_MAX_PAGES: usize = 2;

/// Search query parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Query string exactly as it is sent to the backend
    pub query: String,

    /// Maximum number of result pages to fetch
    pub max_pages: usize,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            query: String::new(),
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

impl SearchQuery {
    /// Create a new search query
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Set maximum pages
    pub fn max_pages(mut self, pages: usize) -> Self {
        self.max_pages = pages;
        self
    }
}

/// A single result entry returned by a backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub content: String,
    /// Displayed URL of the result
    pub url: String,
}

impl SearchHit {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            url: url.into(),
        }
    }
}

/// All hits a source produced for one query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// The query that produced these hits
    pub query: String,

    /// Name of the source that answered
    pub source: String,

    pub hits: Vec<SearchHit>,
}

impl SearchResponse {
    /// Create a new search response
    pub fn new(hits: Vec<SearchHit>, source: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            source: source.into(),
            hits,
        }
    }

    /// Flatten titles, snippets and displayed URLs into one text blob.
    ///
    /// Each field sits on its own line and hits are separated by a blank line,
    /// so an email match can never straddle two fields.
    pub fn text_blob(&self) -> String {
        let mut blob = String::new();
        for hit in &self.hits {
            for field in [&hit.title, &hit.content, &hit.url] {
                if !field.is_empty() {
                    blob.push_str(field);
                    blob.push('\n');
                }
            }
            blob.push('\n');
        }
        blob
    }

    /// Convert into the transient per-query text result
    pub fn into_result(self) -> SearchResult {
        let text_blob = self.text_blob();
        SearchResult {
            query: self.query,
            text_blob,
        }
    }
}

/// Aggregated text for one query, discarded after extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub query: String,
    pub text_blob: String,
}
