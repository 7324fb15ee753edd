//! SearXNG search backend.

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;
use std::time::Duration;
use url::Url;

use crate::models::{SearchHit, SearchQuery, SearchResponse};
use crate::sources::{Source, SourceError};
use crate::utils::HttpClient;

/// Pause between result pages of the same query
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(300);

/// SearXNG search source
///
/// Uses the instance's JSON API (`/search?format=json`), which must be enabled
/// in the instance's `settings.yml`.
#[derive(Debug, Clone)]
pub struct SearxngSource {
    base_url: String,
    http: HttpClient,
    page_delay: Duration,
}

impl SearxngSource {
    /// Create a source for the instance at `base_url`.
    ///
    /// The URL must be absolute `http` or `https`; a trailing slash is dropped.
    pub fn new(base_url: &str, http: HttpClient) -> Result<Self, SourceError> {
        let parsed = Url::parse(base_url.trim()).map_err(|e| {
            SourceError::InvalidRequest(format!("Invalid SearXNG base URL '{}': {}", base_url, e))
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SourceError::InvalidRequest(format!(
                "SearXNG base URL must use http or https: {}",
                base_url
            )));
        }

        Ok(Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            http,
            page_delay: DEFAULT_PAGE_DELAY,
        })
    }

    /// Set the pause between result pages
    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build request URL for one page of results
    fn build_url(&self, query: &str, page: usize) -> String {
        format!(
            "{}/search?q={}&format=json&pageno={}",
            self.base_url,
            urlencoding::encode(query),
            page
        )
    }

    async fn fetch_page(&self, query: &str, page: usize) -> Result<Vec<SearchHit>, SourceError> {
        let url = self.build_url(query, page);
        tracing::debug!("Fetching SearXNG page {}: {}", page, url);

        let response = self.http.client().get(&url).send().await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(SourceError::RateLimit);
        }
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let data: SearxResponse = serde_json::from_str(&body)?;

        Ok(data.results.into_iter().map(Self::parse_hit).collect())
    }

    /// Parse SearXNG result data
    fn parse_hit(result: SearxResult) -> SearchHit {
        SearchHit::new(
            strip_markup(&result.title.unwrap_or_default()),
            strip_markup(&result.content.unwrap_or_default()),
            result.url.unwrap_or_default(),
        )
    }
}

/// Replace HTML tags (highlighting, line breaks) with spaces.
///
/// Only element-shaped tags are removed; bracketed addresses such as
/// `Jane Doe <jane@acme.com>` are left for the extractor.
fn strip_markup(text: &str) -> String {
    static TAGS: OnceLock<Regex> = OnceLock::new();
    let tags = TAGS.get_or_init(|| {
        Regex::new(r"</?[A-Za-z][A-Za-z0-9]*(?:\s[^<>@]*)?/?>").expect("tag regex is valid")
    });
    tags.replace_all(text, " ").trim().to_string()
}

#[async_trait]
impl Source for SearxngSource {
    fn id(&self) -> &str {
        "searxng"
    }

    fn name(&self) -> &str {
        "SearXNG"
    }

    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, SourceError> {
        let mut hits = Vec::new();

        for page in 1..=query.max_pages.max(1) {
            match self.fetch_page(&query.query, page).await {
                Ok(page_hits) if page_hits.is_empty() => {
                    tracing::debug!("No more results on page {} for '{}'", page, query.query);
                    break;
                }
                Ok(page_hits) => {
                    tracing::debug!("Got {} results from page {}", page_hits.len(), page);
                    hits.extend(page_hits);
                }
                Err(e) if page == 1 => return Err(e),
                Err(e) => {
                    tracing::warn!(
                        "SearXNG page {} failed for '{}', keeping earlier pages: {}",
                        page,
                        query.query,
                        e
                    );
                    break;
                }
            }

            if page < query.max_pages && !self.page_delay.is_zero() {
                tokio::time::sleep(self.page_delay).await;
            }
        }

        Ok(SearchResponse::new(hits, self.name(), &query.query))
    }
}

#[derive(Debug, Deserialize)]
struct SearxResponse {
    #[serde(default)]
    results: Vec<SearxResult>,
}

#[derive(Debug, Deserialize)]
struct SearxResult {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn source(base_url: &str) -> SearxngSource {
        SearxngSource::new(base_url, HttpClient::with_options("test", Duration::from_secs(5)).unwrap())
            .unwrap()
            .with_page_delay(Duration::ZERO)
    }

    fn page_matcher(query: &str, page: &str) -> Matcher {
        Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), query.into()),
            Matcher::UrlEncoded("format".into(), "json".into()),
            Matcher::UrlEncoded("pageno".into(), page.into()),
        ])
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let http = HttpClient::new().unwrap();
        assert!(matches!(
            SearxngSource::new("localhost:8080", http.clone()),
            Err(SourceError::InvalidRequest(_))
        ));
        assert!(matches!(
            SearxngSource::new("ftp://searx.local", http.clone()),
            Err(SourceError::InvalidRequest(_))
        ));
        assert!(SearxngSource::new("not a url", http).is_err());
    }

    #[test]
    fn test_build_url_encodes_query() {
        let src = source("http://searx.local/");
        assert_eq!(src.base_url(), "http://searx.local");
        assert_eq!(
            src.build_url("\"Acme Corp\" email", 2),
            "http://searx.local/search?q=%22Acme%20Corp%22%20email&format=json&pageno=2"
        );
    }

    #[test]
    fn test_strip_markup() {
        assert_eq!(
            strip_markup("Mail <b>jane@example.com</b><br/>now"),
            "Mail  jane@example.com  now"
        );
        assert_eq!(
            strip_markup(r#"<span class="hl">Sales</span> team"#),
            "Sales  team"
        );
    }

    #[test]
    fn test_strip_markup_keeps_bracketed_addresses() {
        let text = "Press contact: Jane Doe <jane@acme.com>, sales <sales@acme.com>";
        assert_eq!(strip_markup(text), text);
    }

    #[tokio::test]
    async fn test_bracketed_address_survives_to_text_blob() {
        let mut server = mockito::Server::new_async().await;
        let _page = server
            .mock("GET", "/search")
            .match_query(page_matcher("acme press", "1"))
            .with_status(200)
            .with_body(
                r#"{"results":[{"title":"<b>Acme</b> press","content":"Jane Doe <jane@acme.com>","url":"https://acme.com"}]}"#,
            )
            .create_async()
            .await;

        let src = source(&server.url());
        let response = src.search(&SearchQuery::new("acme press").max_pages(1)).await.unwrap();

        assert_eq!(response.hits[0].title, "Acme  press");
        assert_eq!(
            crate::finder::extract_emails(&response.text_blob()),
            vec!["jane@acme.com"]
        );
    }

    #[tokio::test]
    async fn test_search_collects_pages_until_empty() {
        let mut server = mockito::Server::new_async().await;
        let page_one = server
            .mock("GET", "/search")
            .match_query(page_matcher("site:example.com email", "1"))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"results":[{"title":"Team","content":"Write to <b>jane@example.com</b>","url":"https://example.com/team"}]}"#,
            )
            .create_async()
            .await;
        let page_two = server
            .mock("GET", "/search")
            .match_query(page_matcher("site:example.com email", "2"))
            .with_status(200)
            .with_body(r#"{"results":[]}"#)
            .create_async()
            .await;

        let response = source(&server.url())
            .search(&SearchQuery::new("site:example.com email").max_pages(3))
            .await
            .unwrap();

        page_one.assert_async().await;
        page_two.assert_async().await;
        assert_eq!(response.hits.len(), 1);
        assert_eq!(response.hits[0].content, "Write to  jane@example.com");
        assert_eq!(response.source, "SearXNG");
    }

    #[tokio::test]
    async fn test_first_page_error_fails_query() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(502)
            .create_async()
            .await;

        let err = source(&server.url())
            .search(&SearchQuery::new("q"))
            .await
            .unwrap_err();
        assert_eq!(err, SourceError::Status(502));
    }

    #[tokio::test]
    async fn test_rate_limit_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(429)
            .create_async()
            .await;

        let err = source(&server.url())
            .search(&SearchQuery::new("q"))
            .await
            .unwrap_err();
        assert_eq!(err, SourceError::RateLimit);
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let err = source(&server.url())
            .search(&SearchQuery::new("q"))
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)));
    }

    #[tokio::test]
    async fn test_later_page_error_keeps_earlier_hits() {
        let mut server = mockito::Server::new_async().await;
        let _page_one = server
            .mock("GET", "/search")
            .match_query(page_matcher("q", "1"))
            .with_status(200)
            .with_body(r#"{"results":[{"title":"A","content":"info@acme.com"}]}"#)
            .create_async()
            .await;
        let _page_two = server
            .mock("GET", "/search")
            .match_query(page_matcher("q", "2"))
            .with_status(500)
            .create_async()
            .await;

        let response = source(&server.url())
            .search(&SearchQuery::new("q").max_pages(2))
            .await
            .unwrap();
        assert_eq!(response.hits.len(), 1);
        assert_eq!(response.hits[0].url, "");
    }
}
