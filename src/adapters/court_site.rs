//! North Dakota Supreme Court opinion search (ndcourts.gov).
//!
//! Catches recent opinions the APIs have not indexed yet. The site is
//! scraped, so requests are throttled to one per second.

use std::sync::Arc;

use async_trait::async_trait;
use regex::Regex;
use tracing::warn;

use super::http::{HttpClient, HttpError, HttpRequest};
use super::{cached, CitationSource};
use crate::citations::split_home_citation;
use crate::core::cache::CachePartition;
use crate::core::throttle::Throttle;
use crate::domain::{CitationKind, Source, VerificationResult};

pub const BASE_URL: &str = "https://www.ndcourts.gov";

/// Scraper for the court's opinion search page
pub struct CourtSite {
    base_url: String,
    http: Arc<dyn HttpClient>,
    cache: CachePartition,
    throttle: Throttle,
}

impl CourtSite {
    pub fn new(http: Arc<dyn HttpClient>, cache: CachePartition) -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            http,
            cache,
            throttle: Throttle::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_throttle(mut self, throttle: Throttle) -> Self {
        self.throttle = throttle;
        self
    }

    pub async fn verify_citation(&self, citation: &str) -> VerificationResult {
        if split_home_citation(citation).is_none() {
            return VerificationResult::not_found(Source::CourtSite, citation);
        }

        cached(&self.cache, citation, async {
            self.search(citation).await.unwrap_or_else(|e| {
                warn!(citation, error = %e, "ND Courts lookup failed");
                VerificationResult::failed(Source::CourtSite, citation, e.to_string())
            })
        })
        .await
    }

    async fn search(&self, citation: &str) -> Result<VerificationResult, HttpError> {
        let url = format!("{}/supreme-court/opinions", self.base_url);
        let request = HttpRequest::get(&url).query("search", citation);

        self.throttle.wait().await;
        let html = self.http.get(&request).await?.error_for_status(&url)?.body;

        if !html.contains(citation) {
            return Ok(VerificationResult::not_found(Source::CourtSite, citation));
        }

        Ok(VerificationResult::found(
            Source::CourtSite,
            case_name_near(&html, citation),
            citation,
            format!("{url}?search={}", citation.replace(' ', "+")),
        ))
    }
}

#[async_trait]
impl CitationSource for CourtSite {
    fn name(&self) -> &str {
        "ND Courts"
    }

    fn source(&self) -> Source {
        Source::CourtSite
    }

    fn handles(&self, kind: CitationKind) -> bool {
        kind.is_home_reporter()
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn verify(&self, citation: &str) -> VerificationResult {
        self.verify_citation(citation).await
    }
}

/// First "X v. Y" that precedes `citation` in the page
fn case_name_near(html: &str, citation: &str) -> String {
    let pattern = format!(
        r"([A-Z][a-zA-Z\s.]+v\.\s+[A-Z][a-zA-Z\s.]+).*?{}",
        regex::escape(citation)
    );

    Regex::new(&pattern)
        .ok()
        .and_then(|re| re.captures(html))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::http::HttpResponse;
    use crate::adapters::testing::FakeHttp;
    use std::time::Duration;

    const SEARCH: &str = "https://www.ndcourts.gov/supreme-court/opinions";

    fn site(http: Arc<FakeHttp>) -> CourtSite {
        CourtSite::new(http, CachePartition::in_memory("nd_courts").unwrap())
            .with_throttle(Throttle::new(Duration::ZERO))
    }

    #[test]
    fn test_case_name_near_citation() {
        let html = "<li><a>Interest of A.B. v. State</a> 2024 ND 156</li>";
        assert_eq!(case_name_near(html, "2024 ND 156"), "Interest of A.B. v. State");
        assert_eq!(case_name_near("<p>2024 ND 156</p>", "2024 ND 156"), "");
    }

    #[tokio::test]
    async fn test_citation_on_page_is_found() {
        let html = "<div>Smith v. Jones, 2024 ND 156</div>";
        let http = Arc::new(FakeHttp::new().respond(SEARCH, HttpResponse::ok(html)));
        let result = site(http.clone()).verify_citation("2024 ND 156").await;

        assert!(result.exists);
        assert_eq!(result.source, Source::CourtSite);
        assert_eq!(result.name, "Smith v. Jones");
        assert_eq!(http.requests()[0].query_value("search"), Some("2024 ND 156"));
    }

    #[tokio::test]
    async fn test_page_without_citation_is_not_found() {
        let http = Arc::new(FakeHttp::new().respond(SEARCH, HttpResponse::ok("<p>No results</p>")));
        let result = site(http).verify_citation("2024 ND 999").await;
        assert!(!result.exists);
        assert_eq!(result.error, None);
    }

    #[tokio::test]
    async fn test_foreign_citation_makes_no_request() {
        let http = Arc::new(FakeHttp::new());
        let result = site(http.clone()).verify_citation("384 U.S. 436").await;
        assert!(!result.exists);
        assert_eq!(http.calls(), 0);
    }

    #[tokio::test]
    async fn test_server_error_is_reported() {
        let http = Arc::new(FakeHttp::new().respond(
            SEARCH,
            HttpResponse { status: 500, body: String::new() },
        ));
        let result = site(http).verify_citation("2024 ND 1").await;
        assert!(result.error.unwrap().contains("500"));
    }
}
