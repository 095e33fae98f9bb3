//! CourtListener search API.
//!
//! Requires an API token. Any reporter can be looked up, so this is the only
//! chain step that can confirm N.W.2d and U.S. citations.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};

use super::http::{HttpClient, HttpError, HttpRequest};
use super::{cached, CitationSource};
use crate::core::cache::CachePartition;
use crate::domain::{CitationKind, Source, VerificationResult};

pub const BASE_URL: &str = "https://www.courtlistener.com/api/rest/v4";

const SITE_URL: &str = "https://www.courtlistener.com";

/// Strip an inline `# comment` and surrounding whitespace from a key value
pub fn sanitize_api_key(raw: &str) -> String {
    raw.split('#').next().unwrap_or_default().trim().to_string()
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(default, rename = "caseName")]
    case_name: String,
    #[serde(default)]
    absolute_url: String,
}

/// CourtListener opinion search
pub struct CourtListener {
    api_key: String,
    base_url: String,
    http: Arc<dyn HttpClient>,
    cache: CachePartition,
}

impl CourtListener {
    pub fn new(api_key: Option<&str>, http: Arc<dyn HttpClient>, cache: CachePartition) -> Self {
        let api_key = api_key.map(sanitize_api_key).unwrap_or_default();
        if api_key.is_empty() {
            info!("No CourtListener API key, skipping CourtListener verification");
        }

        Self {
            api_key,
            base_url: BASE_URL.to_string(),
            http,
            cache,
        }
    }

    /// Point at a different API root (mirrors, tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub async fn verify_citation(&self, citation: &str) -> VerificationResult {
        if self.api_key.is_empty() {
            return VerificationResult::failed(Source::PrimaryApi, citation, "No API key");
        }

        cached(&self.cache, citation, async {
            self.search(citation).await.unwrap_or_else(|e| {
                warn!(citation, error = %e, "CourtListener lookup failed");
                VerificationResult::failed(Source::PrimaryApi, citation, e.to_string())
            })
        })
        .await
    }

    async fn search(&self, citation: &str) -> Result<VerificationResult, HttpError> {
        let url = format!("{}/search/", self.base_url);
        let request = HttpRequest::get(&url)
            .query("q", format!("\"{citation}\""))
            .query("type", "o")
            .header("Authorization", format!("Token {}", self.api_key));

        let response = self.http.get(&request).await?.error_for_status(&url)?;
        let data: SearchResponse = response.json(&url)?;

        Ok(match data.results.into_iter().next() {
            Some(hit) => VerificationResult::found(
                Source::PrimaryApi,
                hit.case_name,
                citation,
                format!("{SITE_URL}{}", hit.absolute_url),
            ),
            None => VerificationResult::not_found(Source::PrimaryApi, citation),
        })
    }
}

#[async_trait]
impl CitationSource for CourtListener {
    fn name(&self) -> &str {
        "CourtListener"
    }

    fn source(&self) -> Source {
        Source::PrimaryApi
    }

    fn handles(&self, kind: CitationKind) -> bool {
        kind.is_case()
    }

    fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn verify(&self, citation: &str) -> VerificationResult {
        self.verify_citation(citation).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::http::HttpResponse;
    use crate::adapters::testing::FakeHttp;

    const SEARCH: &str = "https://www.courtlistener.com/api/rest/v4/search/";

    fn client(key: Option<&str>, http: Arc<FakeHttp>) -> CourtListener {
        CourtListener::new(key, http, CachePartition::in_memory("courtlistener").unwrap())
    }

    #[test]
    fn test_sanitize_api_key() {
        assert_eq!(sanitize_api_key("  abc123  # personal key"), "abc123");
        assert_eq!(sanitize_api_key("abc123\n"), "abc123");
        assert_eq!(sanitize_api_key("# only a comment"), "");
    }

    #[tokio::test]
    async fn test_no_key_means_unavailable_and_no_request() {
        let http = Arc::new(FakeHttp::new());
        let cl = client(Some("  # placeholder"), http.clone());

        assert!(!cl.is_available());
        let result = cl.verify_citation("384 U.S. 436").await;
        assert_eq!(result.error.as_deref(), Some("No API key"));
        assert_eq!(http.calls(), 0);
    }

    #[tokio::test]
    async fn test_first_hit_is_reported() {
        let body = r#"{"count": 2, "results": [
            {"caseName": "Miranda v. Arizona", "absolute_url": "/opinion/107252/miranda-v-arizona/"},
            {"caseName": "Other", "absolute_url": "/opinion/1/"}
        ]}"#;
        let http = Arc::new(FakeHttp::new().respond(SEARCH, HttpResponse::ok(body)));
        let cl = client(Some("secret"), http.clone());

        let result = cl.verify_citation("384 U.S. 436").await;
        assert!(result.exists);
        assert_eq!(result.name, "Miranda v. Arizona");
        assert_eq!(
            result.url,
            "https://www.courtlistener.com/opinion/107252/miranda-v-arizona/"
        );

        let request = &http.requests()[0];
        assert_eq!(request.query_value("q"), Some("\"384 U.S. 436\""));
        assert_eq!(request.query_value("type"), Some("o"));
        assert!(request
            .headers
            .contains(&("Authorization".to_string(), "Token secret".to_string())));
    }

    #[tokio::test]
    async fn test_empty_results_are_not_found() {
        let http = Arc::new(FakeHttp::new().respond(SEARCH, HttpResponse::ok(r#"{"results": []}"#)));
        let result = client(Some("k"), http).verify_citation("1 N.W.2d 1").await;
        assert!(!result.exists);
        assert_eq!(result.error, None);
    }

    #[tokio::test]
    async fn test_http_errors_become_results() {
        let http = Arc::new(FakeHttp::new().respond(
            SEARCH,
            HttpResponse { status: 401, body: "denied".to_string() },
        ));
        let result = client(Some("bad"), http).verify_citation("1 N.W.2d 1").await;
        assert!(!result.exists);
        assert!(result.error.unwrap().contains("401"));

        let offline = Arc::new(FakeHttp::offline());
        let result = client(Some("k"), offline).verify_citation("1 N.W.2d 1").await;
        assert!(result.error.unwrap().contains("connection refused"));
    }
}
