//! Builds the ordered list of search queries for a target.

use std::collections::HashSet;
use std::fmt;

use crate::finder::FinderError;
use crate::models::SearchTarget;

/// Query shape strategy, ordered from most to least specific
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QueryTier {
    /// `"<contact>" "<domain or company>" email`
    ContactWithAnchor,
    /// `"<contact>" email <company or domain>`
    ContactAlternate,
    /// `site:<domain> email`
    SiteSearch,
    /// `"<company or domain>" email contact`
    GenericContact,
    /// `"<company>" "<domain>" email address`
    CompanyAndDomain,
    /// Quoted guesses such as `"first.last@domain"`
    AddressPattern,
}

impl fmt::Display for QueryTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QueryTier::ContactWithAnchor => "contact+anchor",
            QueryTier::ContactAlternate => "contact-alternate",
            QueryTier::SiteSearch => "site",
            QueryTier::GenericContact => "generic",
            QueryTier::CompanyAndDomain => "company+domain",
            QueryTier::AddressPattern => "address-pattern",
        };
        f.write_str(name)
    }
}

/// One generated query string and the tier that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedQuery {
    pub tier: QueryTier,
    pub text: String,
}

/// Produces queries for a [`SearchTarget`].
#[derive(Debug, Clone, Copy)]
pub struct QueryPlanner {
    address_patterns: bool,
}

impl Default for QueryPlanner {
    fn default() -> Self {
        Self {
            address_patterns: true,
        }
    }
}

impl QueryPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle the quoted mailbox-guess queries built from the contact name
    pub fn address_patterns(mut self, enabled: bool) -> Self {
        self.address_patterns = enabled;
        self
    }

    /// Plan the queries for `target`, most specific first.
    ///
    /// Fails with [`FinderError::InsufficientInput`] when the target has no
    /// company name, domain or contact name.
    pub fn plan(&self, target: &SearchTarget) -> Result<Vec<PlannedQuery>, FinderError> {
        let company = target.company_name();
        let domain = target.target_domain();
        let contact = target.contact_name();

        if company.is_none() && domain.is_none() && contact.is_none() {
            return Err(FinderError::InsufficientInput);
        }

        let mut queries = Vec::new();

        if let Some(contact) = contact {
            let tier_one = match domain.or(company) {
                Some(anchor) => format!("\"{}\" \"{}\" email", contact, anchor),
                None => format!("\"{}\" email", contact),
            };
            queries.push((QueryTier::ContactWithAnchor, tier_one));

            if let Some(anchor) = company.or(domain) {
                queries.push((
                    QueryTier::ContactAlternate,
                    format!("\"{}\" email {}", contact, anchor),
                ));
            }
        }

        if let Some(domain) = domain {
            queries.push((QueryTier::SiteSearch, format!("site:{} email", domain)));
        }

        if let Some(anchor) = company.or(domain) {
            queries.push((
                QueryTier::GenericContact,
                format!("\"{}\" email contact", anchor),
            ));
        }

        if let (Some(company), Some(domain)) = (company, domain) {
            queries.push((
                QueryTier::CompanyAndDomain,
                format!("\"{}\" \"{}\" email address", company, domain),
            ));
        }

        if self.address_patterns {
            if let (Some(contact), Some(domain)) = (contact, domain) {
                for address in address_guesses(contact, domain) {
                    queries.push((QueryTier::AddressPattern, format!("\"{}\"", address)));
                }
            }
        }

        let mut seen = HashSet::new();
        let planned: Vec<PlannedQuery> = queries
            .into_iter()
            .filter(|(_, text)| seen.insert(text.clone()))
            .map(|(tier, text)| PlannedQuery { tier, text })
            .collect();

        tracing::debug!("Planned {} queries for '{}'", planned.len(), target.search_name());
        Ok(planned)
    }
}

/// Common mailbox shapes for a contact with at least a first and last name.
fn address_guesses(contact: &str, domain: &str) -> Vec<String> {
    let parts: Vec<String> = contact
        .split_whitespace()
        .map(|part| {
            part.chars()
                .filter(|c| c.is_alphanumeric() || *c == '-')
                .collect::<String>()
                .to_lowercase()
        })
        .filter(|part| !part.is_empty())
        .collect();

    let (first, last) = match (parts.first(), parts.last()) {
        (Some(first), Some(last)) if parts.len() >= 2 => (first, last),
        _ => return Vec::new(),
    };

    let initial: String = first.chars().take(1).collect();

    vec![
        format!("{}{}@{}", initial, last, domain),
        format!("{}.{}@{}", first, last, domain),
        format!("{}{}@{}", first, last, domain),
        format!("{}.{}@{}", last, first, domain),
        format!("{}@{}", first, domain),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(queries: &[PlannedQuery]) -> Vec<&str> {
        queries.iter().map(|q| q.text.as_str()).collect()
    }

    #[test]
    fn test_domain_only() {
        let target = SearchTarget::new("example.com");
        let queries = QueryPlanner::new().plan(&target).unwrap();
        assert_eq!(
            texts(&queries),
            vec!["site:example.com email", "\"example.com\" email contact"]
        );
    }

    #[test]
    fn test_company_only() {
        let target = SearchTarget::new("Acme Corp");
        let queries = QueryPlanner::new().plan(&target).unwrap();
        assert_eq!(texts(&queries), vec!["\"Acme Corp\" email contact"]);
        assert_eq!(queries[0].tier, QueryTier::GenericContact);
    }

    #[test]
    fn test_all_inputs_in_tier_order() {
        let target = SearchTarget::resolve("Acme Corp", Some("Jane Doe"), Some("acme.com"));
        let queries = QueryPlanner::new().address_patterns(false).plan(&target).unwrap();
        assert_eq!(
            texts(&queries),
            vec![
                "\"Jane Doe\" \"acme.com\" email",
                "\"Jane Doe\" email Acme Corp",
                "site:acme.com email",
                "\"Acme Corp\" email contact",
                "\"Acme Corp\" \"acme.com\" email address",
            ]
        );

        let tiers: Vec<QueryTier> = queries.iter().map(|q| q.tier).collect();
        let mut sorted = tiers.clone();
        sorted.sort();
        assert_eq!(tiers, sorted);
    }

    #[test]
    fn test_address_patterns_follow_core_tiers() {
        let target = SearchTarget::resolve("example.com", Some("Jane Q. Doe"), None);
        let queries = QueryPlanner::new().plan(&target).unwrap();
        let patterns: Vec<&str> = queries
            .iter()
            .filter(|q| q.tier == QueryTier::AddressPattern)
            .map(|q| q.text.as_str())
            .collect();

        assert_eq!(
            patterns,
            vec![
                "\"jdoe@example.com\"",
                "\"jane.doe@example.com\"",
                "\"janedoe@example.com\"",
                "\"doe.jane@example.com\"",
                "\"jane@example.com\"",
            ]
        );
        assert_eq!(queries.last().unwrap().tier, QueryTier::AddressPattern);
    }

    #[test]
    fn test_single_word_contact_has_no_patterns() {
        let target = SearchTarget::resolve("example.com", Some("Jane"), None);
        let queries = QueryPlanner::new().plan(&target).unwrap();
        assert!(queries.iter().all(|q| q.tier != QueryTier::AddressPattern));
    }

    #[test]
    fn test_contact_only() {
        let target = SearchTarget::resolve("", Some("Jane Doe"), None);
        let queries = QueryPlanner::new().plan(&target).unwrap();
        assert_eq!(texts(&queries), vec!["\"Jane Doe\" email"]);
    }

    #[test]
    fn test_queries_are_distinct() {
        let target = SearchTarget::resolve("example.com", Some("Jane Doe"), None);
        let queries = QueryPlanner::new().plan(&target).unwrap();
        let unique: HashSet<&str> = queries.iter().map(|q| q.text.as_str()).collect();
        assert_eq!(unique.len(), queries.len());
        assert!(!queries.is_empty());
    }

    #[test]
    fn test_insufficient_input() {
        let target = SearchTarget::new("   ");
        let err = QueryPlanner::new().plan(&target).unwrap_err();
        assert!(matches!(err, FinderError::InsufficientInput));
    }
}
