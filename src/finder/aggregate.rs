//! Folds per-query outcomes into the final email list.

use crate::finder::extract::extract_emails;
use crate::finder::filter::{filter_candidates, Blacklist};
use crate::finder::FinderError;
use crate::models::SearchResult;
use crate::sources::SourceError;
use crate::utils::EmailSet;

/// What one planned query produced
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// The backend answered; the text may still be empty
    Completed(SearchResult),
    /// The backend call failed; contributes nothing
    Failed { query: String, error: SourceError },
}

impl QueryOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, QueryOutcome::Failed { .. })
    }

    pub fn query(&self) -> &str {
        match self {
            QueryOutcome::Completed(result) => &result.query,
            QueryOutcome::Failed { query, .. } => query,
        }
    }
}

/// Merge outcomes, given in query order, into the filtered address list.
///
/// Addresses keep the position of their first sighting across queries. If
/// every query failed the run is reported as [`FinderError::SearchUnavailable`].
pub fn fold_outcomes(
    outcomes: &[QueryOutcome],
    target_domain: Option<&str>,
    blacklist: &Blacklist,
) -> Result<Vec<String>, FinderError> {
    if !outcomes.is_empty() && outcomes.iter().all(QueryOutcome::is_failed) {
        return Err(FinderError::SearchUnavailable {
            attempted: outcomes.len(),
        });
    }

    let mut found = EmailSet::new();
    let mut candidate_count = 0;

    for outcome in outcomes {
        let QueryOutcome::Completed(result) = outcome else {
            continue;
        };

        let candidates = extract_emails(&result.text_blob);
        candidate_count += candidates.len();

        let kept = filter_candidates(&candidates, target_domain, blacklist);
        let added = found.extend(&kept);
        if added > 0 {
            tracing::info!("Query '{}' contributed {} new email(s)", result.query, added);
        }
    }

    tracing::info!(
        "Kept {} email(s) out of {} candidate(s) from {} queries",
        found.len(),
        candidate_count,
        outcomes.len()
    );
    Ok(found.into_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed(query: &str, text: &str) -> QueryOutcome {
        QueryOutcome::Completed(SearchResult {
            query: query.to_string(),
            text_blob: text.to_string(),
        })
    }

    fn failed(query: &str) -> QueryOutcome {
        QueryOutcome::Failed {
            query: query.to_string(),
            error: SourceError::Network("refused".to_string()),
        }
    }

    #[test]
    fn test_duplicate_across_queries_kept_once_at_first_position() {
        let outcomes = vec![
            completed("q1", "jane@example.com"),
            completed("q2", "bob@example.com\nJane@Example.com"),
        ];
        let emails = fold_outcomes(&outcomes, Some("example.com"), &Blacklist::default()).unwrap();
        assert_eq!(emails, vec!["jane@example.com", "bob@example.com"]);
    }

    #[test]
    fn test_query_order_wins_over_text_order() {
        let outcomes = vec![
            completed("tier1", "zed@acme.com"),
            completed("tier4", "amy@acme.com\nzed@acme.com"),
        ];
        let emails = fold_outcomes(&outcomes, None, &Blacklist::empty()).unwrap();
        assert_eq!(emails, vec!["zed@acme.com", "amy@acme.com"]);
    }

    #[test]
    fn test_partial_failure_is_not_an_error() {
        let outcomes = vec![failed("q1"), completed("q2", "info@acme.com")];
        let emails = fold_outcomes(&outcomes, Some("acme.com"), &Blacklist::default()).unwrap();
        assert_eq!(emails, vec!["info@acme.com"]);
    }

    #[test]
    fn test_all_failed_is_unavailable() {
        let outcomes = vec![failed("q1"), failed("q2")];
        let err = fold_outcomes(&outcomes, None, &Blacklist::default()).unwrap_err();
        assert!(matches!(err, FinderError::SearchUnavailable { attempted: 2 }));
    }

    #[test]
    fn test_zero_hits_is_success() {
        let outcomes = vec![completed("q1", ""), completed("q2", "nothing here")];
        let emails = fold_outcomes(&outcomes, None, &Blacklist::default()).unwrap();
        assert!(emails.is_empty());
    }

    #[test]
    fn test_outcome_query_accessor() {
        assert_eq!(failed("q9").query(), "q9");
        assert_eq!(completed("q3", "").query(), "q3");
    }
}
