//! Turns raw user input into a canonical target domain or a company name.

use regex::Regex;
use std::sync::OnceLock;
use url::Url;

/// Outcome of resolving one raw input string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedInput {
    /// Lower-cased host without scheme, port, path or `www.` prefix
    Domain(String),
    /// Free-text company name, trimmed
    CompanyName(String),
    /// Nothing usable
    Empty,
}

/// A whole input that reads like `host.tld` with optional port/path.
fn domain_like_input() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(?:[a-z0-9-]+\.)+[a-z]{2,}(?::\d+)?(?:[/?#].*)?$")
            .expect("domain-like input regex is valid")
    })
}

/// A canonical host: labels of `[a-z0-9-]` not starting or ending with `-`,
/// final label alphabetic and at least two characters.
fn canonical_domain() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z]{2,}$")
            .expect("canonical domain regex is valid")
    })
}

fn has_scheme(input: &str) -> bool {
    let lower = input.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("//")
}

/// Resolve raw input.
///
/// URLs and domain-shaped strings become [`ResolvedInput::Domain`]; anything
/// containing whitespace, or that fails to sanitize, is a company name.
pub fn resolve_input(input: &str) -> ResolvedInput {
    let input = input.trim();
    if input.is_empty() {
        return ResolvedInput::Empty;
    }

    if input.chars().any(char::is_whitespace) {
        tracing::debug!("Input '{}' contains whitespace, treating as company name", input);
        return ResolvedInput::CompanyName(input.to_string());
    }

    if has_scheme(input) || domain_like_input().is_match(input) {
        match sanitize_domain(input) {
            Some(domain) => {
                tracing::debug!("Input '{}' resolved to domain '{}'", input, domain);
                return ResolvedInput::Domain(domain);
            }
            None => {
                tracing::warn!(
                    "Input '{}' looked like a domain but failed sanitization, treating as company name",
                    input
                );
            }
        }
    }

    ResolvedInput::CompanyName(input.to_string())
}

/// Extract the bare, lower-cased domain from a URL or domain string.
///
/// Returns `None` when no valid domain can be derived.
pub fn sanitize_domain(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() || input.chars().any(char::is_whitespace) {
        return None;
    }

    let candidate = if input.starts_with("//") {
        format!("https:{}", input)
    } else if has_scheme(input) {
        input.to_string()
    } else {
        format!("https://{}", input)
    };

    let url = Url::parse(&candidate).ok()?;
    let host = url.host_str()?.to_ascii_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);

    if canonical_domain().is_match(host) {
        Some(host.to_string())
    } else {
        None
    }
}
