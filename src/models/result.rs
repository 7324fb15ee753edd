//! The terminal artifact of one run.

use serde::{Deserialize, Serialize};

use crate::finder::FinderError;
use crate::models::SearchTarget;

/// Result handed to the presentation layer, exactly one per invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    pub search_name: String,
    pub target_domain: Option<String>,
    pub found_emails: Vec<String>,
    pub error: Option<String>,
}

impl RunResult {
    /// Successful run, possibly with zero emails
    pub fn success(target: &SearchTarget, found_emails: Vec<String>) -> Self {
        Self {
            search_name: target.search_name(),
            target_domain: target.target_domain().map(str::to_string),
            found_emails,
            error: None,
        }
    }

    /// Run aborted by a pipeline-level failure; never carries emails
    pub fn failure(target: &SearchTarget, error: &FinderError) -> Self {
        Self {
            search_name: target.search_name(),
            target_domain: target.target_domain().map(str::to_string),
            found_emails: Vec::new(),
            error: Some(error.to_string()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
