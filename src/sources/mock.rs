//! Mock source for testing purposes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use crate::models::{SearchHit, SearchQuery, SearchResponse};
use crate::sources::{Source, SourceError};

/// A mock source that returns predefined responses.
///
/// Responses can be registered per query text; any other query gets the
/// fallback, which is an empty hit list unless [`MockSource::fail_all`] was
/// called. The source also records calls and the peak number of concurrent
/// searches.
#[derive(Debug, Default)]
pub struct MockSource {
    responses: Mutex<HashMap<String, Result<Vec<SearchHit>, SourceError>>>,
    delays: Mutex<HashMap<String, Duration>>,
    fallback_error: Mutex<Option<SourceError>>,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockSource {
    /// Create a new mock source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `hits` for the query text `query`.
    pub fn set_hits(&self, query: &str, hits: Vec<SearchHit>) {
        lock(&self.responses).insert(query.to_string(), Ok(hits));
    }

    /// Fail the query text `query` with `error`.
    pub fn set_error(&self, query: &str, error: SourceError) {
        lock(&self.responses).insert(query.to_string(), Err(error));
    }

    /// Delay the answer for `query`, useful to force completion order.
    pub fn set_delay(&self, query: &str, delay: Duration) {
        lock(&self.delays).insert(query.to_string(), delay);
    }

    /// Fail every query that has no explicit response.
    pub fn fail_all(&self, error: SourceError) {
        *lock(&self.fallback_error) = Some(error);
    }

    /// Clear the configured responses.
    pub fn clear_responses(&self) {
        lock(&self.responses).clear();
        *lock(&self.fallback_error) = None;
    }

    /// Query texts received so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    /// Highest number of searches that were running at the same time.
    pub fn peak_concurrency(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Source for MockSource {
    fn id(&self) -> &str {
        "mock"
    }

    fn name(&self) -> &str {
        "Mock Source"
    }

    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, SourceError> {
        lock(&self.calls).push(query.query.clone());

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(running, Ordering::SeqCst);

        let delay = lock(&self.delays).get(&query.query).copied();
        // Always yield once so overlapping searches are observable.
        tokio::time::sleep(delay.unwrap_or(Duration::from_millis(1))).await;

        let configured = lock(&self.responses).get(&query.query).cloned();
        let fallback = lock(&self.fallback_error).clone();

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let hits = match (configured, fallback) {
            (Some(result), _) => result?,
            (None, Some(error)) => return Err(error),
            (None, None) => Vec::new(),
        };

        Ok(SearchResponse::new(hits, self.name(), &query.query))
    }
}

/// Helper function to create a mock hit for testing.
pub fn make_hit(title: &str, content: &str) -> SearchHit {
    SearchHit::new(title, content, format!("https://search.test/{}", title.replace(' ', "-")))
}
