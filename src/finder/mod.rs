//! The email discovery pipeline.
//!
//! Stages, leaf first:
//!
//! - [`resolver`]: raw input to target domain or company name
//! - [`planner`]: ordered search queries for a target
//! - [`extract`]: email-shaped substrings of search result text
//! - [`filter`]: blacklist and target-domain filtering
//! - [`aggregate`]: ordered, deduplicated merge of per-query results
//!
//! [`EmailFinder`] wires them together around a [`Source`].

pub mod aggregate;
pub mod extract;
pub mod filter;
pub mod planner;
pub mod resolver;

pub use aggregate::{fold_outcomes, QueryOutcome};
pub use extract::extract_emails;
pub use filter::{filter_candidates, Blacklist, DEFAULT_BLACKLISTED_DOMAINS};
pub use planner::{PlannedQuery, QueryPlanner, QueryTier};
pub use resolver::{resolve_input, sanitize_domain, ResolvedInput};

use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};

use crate::config::Config;
use crate::models::{RunResult, SearchQuery, SearchTarget, DEFAULT_MAX_PAGES};
use crate::sources::{Source, SourceError};
use crate::utils::{with_retry, RetryConfig};

/// Default cap on simultaneous backend requests
pub const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Pipeline-level failures; the only errors that reach [`RunResult::error`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FinderError {
    /// Nothing to search for
    #[error("Insufficient input: no company name, domain, or contact name could be resolved")]
    InsufficientInput,

    /// Every planned query failed at the backend
    #[error("Search backend unavailable: all {attempted} queries failed")]
    SearchUnavailable { attempted: usize },
}

/// Runs the full query → search → extract → filter pipeline.
#[derive(Debug, Clone)]
pub struct EmailFinder {
    source: Arc<dyn Source>,
    planner: QueryPlanner,
    blacklist: Blacklist,
    retry: RetryConfig,
    max_concurrent: usize,
    max_pages: usize,
}

impl EmailFinder {
    /// Create a finder with default settings
    pub fn new(source: Arc<dyn Source>) -> Self {
        Self {
            source,
            planner: QueryPlanner::default(),
            blacklist: Blacklist::default(),
            retry: RetryConfig::default(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    /// Create a finder configured from `config`
    pub fn from_config(source: Arc<dyn Source>, config: &Config) -> Self {
        Self::new(source)
            .with_planner(QueryPlanner::new().address_patterns(config.planner.address_patterns))
            .with_blacklist(config.filter.blacklist())
            .with_retry(config.retry.to_retry_config())
            .max_concurrent(config.search.max_concurrent)
            .max_pages(config.search.pages_per_query)
    }

    pub fn with_planner(mut self, planner: QueryPlanner) -> Self {
        self.planner = planner;
        self
    }

    pub fn with_blacklist(mut self, blacklist: Blacklist) -> Self {
        self.blacklist = blacklist;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Cap simultaneous backend requests (minimum 1)
    pub fn max_concurrent(mut self, limit: usize) -> Self {
        self.max_concurrent = limit.max(1);
        self
    }

    /// Result pages fetched per query (minimum 1)
    pub fn max_pages(mut self, pages: usize) -> Self {
        self.max_pages = pages.max(1);
        self
    }

    /// Run the pipeline and package the outcome for the presentation layer.
    pub async fn find(&self, target: &SearchTarget) -> RunResult {
        match self.try_find(target).await {
            Ok(emails) => RunResult::success(target, emails),
            Err(e) => {
                tracing::error!("Email search for '{}' failed: {}", target.search_name(), e);
                RunResult::failure(target, &e)
            }
        }
    }

    /// Run the pipeline, returning the filtered addresses in discovery order.
    pub async fn try_find(&self, target: &SearchTarget) -> Result<Vec<String>, FinderError> {
        tracing::info!(
            "Starting email search for '{}' (domain: {}, contact: {})",
            target.search_name(),
            target.target_domain().unwrap_or("-"),
            target.contact_name().unwrap_or("-")
        );

        let queries = self.planner.plan(target)?;
        let outcomes = self.run_queries(&queries).await;
        fold_outcomes(&outcomes, target.target_domain(), &self.blacklist)
    }

    /// Issue every query with bounded concurrency; outcomes come back in
    /// query order regardless of completion order.
    async fn run_queries(&self, queries: &[PlannedQuery]) -> Vec<QueryOutcome> {
        tracing::info!(
            "Running {} search queries (max {} concurrent)",
            queries.len(),
            self.max_concurrent
        );

        let (sender, mut receiver) = mpsc::channel(queries.len().max(1));
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));

        for (index, planned) in queries.iter().enumerate() {
            tracing::info!(
                "Query {}/{} [{}]: {}",
                index + 1,
                queries.len(),
                planned.tier,
                planned.text
            );

            let permit = match semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    let error = SourceError::Other(format!("Concurrency limiter closed: {}", e));
                    let _ = sender
                        .send((index, failed(&planned.text, error)))
                        .await;
                    continue;
                }
            };

            let sender = sender.clone();
            let source = self.source.clone();
            let retry = self.retry;
            let query = SearchQuery::new(planned.text.clone()).max_pages(self.max_pages);

            tokio::spawn(async move {
                let outcome = match with_retry(retry, || source.search(&query)).await {
                    Ok(response) => QueryOutcome::Completed(response.into_result()),
                    Err(e) => {
                        tracing::warn!("Search failed for '{}': {}", query.query, e);
                        failed(&query.query, e)
                    }
                };
                drop(permit);
                // Receiver outlives every task; a send error only means the run was dropped.
                let _ = sender.send((index, outcome)).await;
            });
        }

        // Drop sender to signal completion when all tasks finish
        drop(sender);

        let mut slots: Vec<Option<QueryOutcome>> = vec![None; queries.len()];
        while let Some((index, outcome)) = receiver.recv().await {
            slots[index] = Some(outcome);
        }

        slots
            .into_iter()
            .zip(queries)
            .map(|(slot, planned)| {
                slot.unwrap_or_else(|| {
                    failed(
                        &planned.text,
                        SourceError::Other("search task aborted".to_string()),
                    )
                })
            })
            .collect()
    }
}

fn failed(query: &str, error: SourceError) -> QueryOutcome {
    QueryOutcome::Failed {
        query: query.to_string(),
        error,
    }
}
