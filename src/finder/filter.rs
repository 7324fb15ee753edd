//! Blacklist and target-domain filtering of email candidates.

use std::collections::HashSet;

/// Free-mail providers, email-lookup services and platforms whose addresses
/// never belong to the company being searched.
pub const DEFAULT_BLACKLISTED_DOMAINS: &[&str] = &[
    "email-format.com",
    "rocketreach.co",
    "hunter.io",
    "clearbit.com",
    "apollo.io",
    "emailhippo.com",
    "mailcheck.ai",
    "verify-email.org",
    "email-checker.net",
    "findemails.com",
    "findthat.email",
    "skymem.info",
    "anymail.com",
    "snov.io",
    "thatsthem.com",
    "emailfinder.io",
    "aol.com",
    "gmail.com",
    "googlemail.com",
    "hotmail.com",
    "msn.com",
    "live.com",
    "yahoo.com",
    "outlook.com",
    "gmx.com",
    "mail.com",
    "wix.com",
    "squarespace.com",
    "godaddy.com",
    "zoho.com",
    "yandex.com",
    "protonmail.com",
    "github.com",
    "icloud.com",
    "privaterelay.appleid.com",
    "linkedin.com",
    "facebook.com",
    "twitter.com",
    "instagram.com",
    "support.com",
    "service.com",
    "info.com",
];

/// Set of domains whose addresses are always discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blacklist {
    domains: HashSet<String>,
}

impl Default for Blacklist {
    fn default() -> Self {
        Self::from_domains(DEFAULT_BLACKLISTED_DOMAINS.iter().copied())
    }
}

impl Blacklist {
    /// An empty blacklist
    pub fn empty() -> Self {
        Self {
            domains: HashSet::new(),
        }
    }

    /// Build from a custom list; entries are trimmed and lower-cased
    pub fn from_domains<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut blacklist = Self::empty();
        blacklist.extend(domains);
        blacklist
    }

    /// Add more domains
    pub fn extend<I, S>(&mut self, domains: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.domains.extend(
            domains
                .into_iter()
                .map(|d| d.as_ref().trim().to_lowercase())
                .filter(|d| !d.is_empty()),
        );
    }

    /// Exact, case-insensitive membership
    pub fn contains(&self, domain: &str) -> bool {
        self.domains.contains(&domain.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

/// Lower-cased domain part of an address, if it has one
pub fn email_domain(email: &str) -> Option<String> {
    email
        .rsplit_once('@')
        .map(|(_, domain)| domain.to_lowercase())
        .filter(|domain| !domain.is_empty())
}

/// Keep candidates that are not blacklisted and, when a target domain is
/// known, sit exactly on it. Order is preserved.
pub fn filter_candidates(
    candidates: &[String],
    target_domain: Option<&str>,
    blacklist: &Blacklist,
) -> Vec<String> {
    let target = target_domain.map(str::to_lowercase);

    let kept: Vec<String> = candidates
        .iter()
        .filter(|email| {
            let Some(domain) = email_domain(email) else {
                tracing::debug!("Skipping malformed candidate: {}", email);
                return false;
            };

            if blacklist.contains(&domain) {
                tracing::debug!("Ignoring blacklisted domain: {}", email);
                return false;
            }

            if let Some(target) = &target {
                if &domain != target {
                    tracing::debug!("Ignoring non-target domain: {} (expected {})", email, target);
                    return false;
                }
            }

            true
        })
        .cloned()
        .collect();

    tracing::debug!("Kept {} of {} candidates", kept.len(), candidates.len());
    kept
}
