//! Integration tests for Lead Email Finder
//!
//! These tests run the full pipeline against a mocked SearXNG instance.

use lead_email_finder::config::Config;
use lead_email_finder::finder::{Blacklist, EmailFinder, FinderError};
use lead_email_finder::sources::SearxngSource;
use lead_email_finder::utils::HttpClient;
use lead_email_finder::SearchTarget;
use mockito::Matcher;
use std::sync::Arc;
use std::time::Duration;

fn searxng(base_url: &str) -> Arc<SearxngSource> {
    let http = HttpClient::with_options("integration-test", Duration::from_secs(5)).unwrap();
    Arc::new(
        SearxngSource::new(base_url, http)
            .unwrap()
            .with_page_delay(Duration::ZERO),
    )
}

fn results_body(entries: &[(&str, &str, &str)]) -> String {
    let results: Vec<serde_json::Value> = entries
        .iter()
        .map(|(title, content, url)| {
            serde_json::json!({ "title": title, "content": content, "url": url })
        })
        .collect();
    serde_json::json!({ "results": results }).to_string()
}

/// Domain input, no contact: only addresses on the domain survive
#[tokio::test]
async fn test_domain_input_end_to_end() {
    let mut server = mockito::Server::new_async().await;

    let _site = server
        .mock("GET", "/search")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "site:example.com email".into()),
            Matcher::UrlEncoded("pageno".into(), "1".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(results_body(&[
            ("Our team", "Reach jane@example.com for sales", "https://example.com/team"),
            ("Partner", "Write to info@otherdomain.com", "https://otherdomain.com"),
        ]))
        .create_async()
        .await;

    // Everything else: no results
    let _rest = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"results":[]}"#)
        .create_async()
        .await;

    let finder = EmailFinder::new(searxng(&server.url())).max_pages(1);
    let result = finder.find(&SearchTarget::new("example.com")).await;

    assert_eq!(result.found_emails, vec!["jane@example.com"]);
    assert_eq!(result.error, None);
    assert_eq!(result.target_domain.as_deref(), Some("example.com"));
}

/// Company name with a backend that refuses connections
#[tokio::test]
async fn test_unreachable_backend() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let finder = EmailFinder::new(searxng(&format!("http://127.0.0.1:{}", port)));
    let result = finder.find(&SearchTarget::new("Acme Corp")).await;

    assert!(result.found_emails.is_empty());
    assert_eq!(result.target_domain, None);
    assert_eq!(result.search_name, "Acme Corp");
    assert_eq!(
        result.error,
        Some(FinderError::SearchUnavailable { attempted: 1 }.to_string())
    );
}

/// Backend errors on some queries degrade gracefully
#[tokio::test]
async fn test_partial_backend_failure() {
    let mut server = mockito::Server::new_async().await;

    let _generic = server
        .mock("GET", "/search")
        .match_query(Matcher::UrlEncoded(
            "q".into(),
            "\"Acme Corp\" email contact".into(),
        ))
        .with_status(200)
        .with_body(results_body(&[(
            "Acme Corp contact",
            "hello@acme.com, someone@gmail.com",
            "https://acme.com/contact",
        )]))
        .create_async()
        .await;

    let _broken = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let finder = EmailFinder::new(searxng(&server.url())).max_pages(1);
    let target = SearchTarget::resolve("Acme Corp", Some("Jane Doe"), None);
    let result = finder.find(&target).await;

    assert_eq!(result.error, None);
    assert_eq!(result.found_emails, vec!["hello@acme.com"]);
}

/// Addresses from several tiers merge in tier order, deduplicated
#[tokio::test]
async fn test_tiers_merge_without_duplicates() {
    let mut server = mockito::Server::new_async().await;

    let _tier_one = server
        .mock("GET", "/search")
        .match_query(Matcher::UrlEncoded(
            "q".into(),
            "\"Jane Doe\" \"acme.com\" email".into(),
        ))
        .with_status(200)
        .with_body(results_body(&[("Jane Doe", "jane.doe@acme.com", "")]))
        .create_async()
        .await;

    let _site = server
        .mock("GET", "/search")
        .match_query(Matcher::UrlEncoded("q".into(), "site:acme.com email".into()))
        .with_status(200)
        .with_body(results_body(&[(
            "Contact",
            "press@acme.com or JANE.DOE@ACME.COM",
            "https://acme.com/contact",
        )]))
        .create_async()
        .await;

    let _rest = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"results":[]}"#)
        .create_async()
        .await;

    let mut config = Config::default();
    config.search.pages_per_query = 1;
    config.planner.address_patterns = false;

    let finder = EmailFinder::from_config(searxng(&server.url()), &config);
    let target = SearchTarget::resolve("Acme Corp", Some("Jane Doe"), Some("acme.com"));
    let result = finder.find(&target).await;

    assert_eq!(result.found_emails, vec!["jane.doe@acme.com", "press@acme.com"]);
    assert_eq!(result.search_name, "Acme Corp");
    assert_eq!(result.target_domain.as_deref(), Some("acme.com"));
}

/// A custom blacklist replaces the built-in provider list
#[tokio::test]
async fn test_injected_blacklist() {
    let mut server = mockito::Server::new_async().await;

    let _all = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(results_body(&[(
            "Directory",
            "a@acme.com b@gmail.com c@reseller.net",
            "",
        )]))
        .create_async()
        .await;

    let finder = EmailFinder::new(searxng(&server.url()))
        .max_pages(1)
        .with_blacklist(Blacklist::from_domains(["reseller.net"]));
    let result = finder.find(&SearchTarget::new("Acme")).await;

    assert_eq!(result.found_emails, vec!["a@acme.com", "b@gmail.com"]);
}

/// Empty input never reaches the backend
#[tokio::test]
async fn test_insufficient_input() {
    let mut server = mockito::Server::new_async().await;
    let untouched = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let finder = EmailFinder::new(searxng(&server.url()));
    let result = finder.find(&SearchTarget::new("")).await;

    assert_eq!(result.error, Some(FinderError::InsufficientInput.to_string()));
    assert!(result.found_emails.is_empty());
    untouched.assert_async().await;
}
