//! The resolved search target for one run.

use serde::Serialize;

use crate::finder::resolver::{resolve_input, ResolvedInput};

/// Everything the pipeline knows about who it is looking for.
///
/// Built once per run from the raw input and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchTarget {
    raw_input: String,
    company_name: Option<String>,
    target_domain: Option<String>,
    contact_name: Option<String>,
}

impl SearchTarget {
    /// Resolve a raw company name, URL or bare domain.
    pub fn new(raw_input: impl Into<String>) -> Self {
        Self::resolve(raw_input, None, None)
    }

    /// Resolve the raw input together with an optional contact name and an
    /// optional domain hint.
    ///
    /// The hint only applies when the raw input is a company name; it goes
    /// through the same resolution rules and is dropped if it does not look
    /// like a domain.
    pub fn resolve(
        raw_input: impl Into<String>,
        contact_name: Option<&str>,
        domain_hint: Option<&str>,
    ) -> Self {
        let raw_input = raw_input.into();

        let (company_name, mut target_domain) = match resolve_input(&raw_input) {
            ResolvedInput::Domain(domain) => (None, Some(domain)),
            ResolvedInput::CompanyName(name) => (Some(name), None),
            ResolvedInput::Empty => (None, None),
        };

        if let Some(hint) = domain_hint {
            match (&target_domain, resolve_input(hint)) {
                (None, ResolvedInput::Domain(domain)) => target_domain = Some(domain),
                (Some(domain), _) => {
                    tracing::debug!("Ignoring domain hint '{}', input already resolved to '{}'", hint, domain);
                }
                (None, _) => {
                    tracing::warn!("Domain hint '{}' is not a valid domain, ignoring it", hint);
                }
            }
        }

        let contact_name = contact_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string);

        Self {
            raw_input,
            company_name,
            target_domain,
            contact_name,
        }
    }

    pub fn raw_input(&self) -> &str {
        &self.raw_input
    }

    pub fn company_name(&self) -> Option<&str> {
        self.company_name.as_deref()
    }

    pub fn target_domain(&self) -> Option<&str> {
        self.target_domain.as_deref()
    }

    pub fn contact_name(&self) -> Option<&str> {
        self.contact_name.as_deref()
    }

    /// The primary anchor used in queries: company name, else domain.
    pub fn anchor(&self) -> Option<&str> {
        self.company_name().or(self.target_domain())
    }

    /// Name reported in the run result.
    ///
    /// Falls back to the contact name, then to the raw input, so it is never
    /// empty for a non-empty input.
    pub fn search_name(&self) -> String {
        self.anchor()
            .or(self.contact_name())
            .unwrap_or(self.raw_input.trim())
            .to_string()
    }
}
