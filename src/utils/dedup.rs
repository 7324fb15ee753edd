//! Order-preserving, case-insensitive deduplication of email addresses.

use std::collections::HashSet;

/// Insertion-ordered set of addresses compared case-insensitively.
///
/// The first spelling of an address wins; later spellings that differ only in
/// case are dropped.
#[derive(Debug, Clone, Default)]
pub struct EmailSet {
    seen: HashSet<String>,
    ordered: Vec<String>,
}

impl EmailSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an address; returns `true` if it was not already present
    pub fn insert(&mut self, email: &str) -> bool {
        if self.seen.insert(email.to_lowercase()) {
            self.ordered.push(email.to_string());
            true
        } else {
            false
        }
    }

    /// Insert every address in order; returns how many were new
    pub fn extend<I, S>(&mut self, emails: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        emails
            .into_iter()
            .filter(|email| self.insert(email.as_ref()))
            .count()
    }

    pub fn contains(&self, email: &str) -> bool {
        self.seen.contains(&email.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ordered.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.ordered
    }
}
