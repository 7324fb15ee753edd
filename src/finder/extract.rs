//! Lexical email extraction from free text.

use regex::Regex;
use std::sync::OnceLock;

use crate::utils::EmailSet;

/// `local@label.label…tld`; the character classes exclude whitespace, so a
/// match never crosses a line or field boundary.
fn email_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[A-Za-z0-9._%+-]+@(?:[A-Za-z0-9-]+\.)+[A-Za-z]{2,}")
            .expect("email regex is valid")
    })
}

/// Return every email-shaped substring of `text`.
///
/// Results are in first-seen order, deduplicated case-insensitively, with the
/// casing of the first occurrence preserved.
pub fn extract_emails(text: &str) -> Vec<String> {
    let mut found = EmailSet::new();
    for m in email_pattern().find_iter(text) {
        found.insert(m.as_str());
    }
    tracing::debug!("Extracted {} unique potential emails", found.len());
    found.into_vec()
}
