//! Case.law API, a secondary opinion for case citations.
//!
//! Not part of the verification chain; callers ask for it explicitly.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use super::http::{HttpClient, HttpError, HttpRequest};
use super::{cached, CitationSource};
use crate::core::cache::CachePartition;
use crate::domain::{CitationKind, Source, VerificationResult};

pub const BASE_URL: &str = "https://api.case.law/v1";

#[derive(Debug, Deserialize)]
struct CasesResponse {
    #[serde(default)]
    results: Vec<CaseHit>,
}

#[derive(Debug, Deserialize)]
struct CaseHit {
    #[serde(default)]
    name_abbreviation: String,
    #[serde(default)]
    citations: Vec<CaseCite>,
    #[serde(default)]
    frontend_url: String,
}

#[derive(Debug, Deserialize)]
struct CaseCite {
    #[serde(default)]
    cite: String,
}

/// Case.law client, scoped to North Dakota
pub struct CaseLaw {
    base_url: String,
    http: Arc<dyn HttpClient>,
    cache: CachePartition,
}

impl CaseLaw {
    pub fn new(http: Arc<dyn HttpClient>, cache: CachePartition) -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            http,
            cache,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub async fn verify_citation(&self, citation: &str) -> VerificationResult {
        cached(&self.cache, citation, async {
            self.search(citation).await.unwrap_or_else(|e| {
                warn!(citation, error = %e, "Case.law lookup failed");
                VerificationResult::failed(Source::BackupApi, citation, e.to_string())
            })
        })
        .await
    }

    async fn search(&self, citation: &str) -> Result<VerificationResult, HttpError> {
        let url = format!("{}/cases/", self.base_url);
        let request = HttpRequest::get(&url)
            .query("cite", citation)
            .query("jurisdiction", "nd");

        let data: CasesResponse = self
            .http
            .get(&request)
            .await?
            .error_for_status(&url)?
            .json(&url)?;

        let Some(hit) = data.results.into_iter().next() else {
            return Ok(VerificationResult::not_found(Source::BackupApi, citation));
        };

        let full_citation = hit
            .citations
            .into_iter()
            .next()
            .map(|c| c.cite)
            .filter(|cite| !cite.is_empty())
            .unwrap_or_else(|| citation.to_string());

        Ok(VerificationResult::found(
            Source::BackupApi,
            hit.name_abbreviation,
            full_citation,
            hit.frontend_url,
        ))
    }
}

#[async_trait]
impl CitationSource for CaseLaw {
    fn name(&self) -> &str {
        "Case.law"
    }

    fn source(&self) -> Source {
        Source::BackupApi
    }

    fn handles(&self, kind: CitationKind) -> bool {
        kind.is_case()
    }

    fn is_available(&self) -> bool {
        true
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

    const CASES: &str = "https://api.case.law/v1/cases/";

    fn caselaw(http: Arc<FakeHttp>) -> CaseLaw {
        CaseLaw::new(http, CachePartition::in_memory("caselaw").unwrap())
    }

    #[tokio::test]
    async fn test_hit_uses_reported_citation() {
        let body = r#"{"results": [{
            "name_abbreviation": "State v. Smith",
            "citations": [{"cite": "2019 ND 12", "type": "official"}],
            "frontend_url": "https://cite.case.law/nd/2019/12/"
        }]}"#;
        let http = Arc::new(FakeHttp::new().respond(CASES, HttpResponse::ok(body)));
        let result = caselaw(http.clone()).verify_citation("2019 ND 12").await;

        assert!(result.exists);
        assert_eq!(result.source, Source::BackupApi);
        assert_eq!(result.name, "State v. Smith");
        assert_eq!(result.full_citation, "2019 ND 12");
        assert_eq!(http.requests()[0].query_value("jurisdiction"), Some("nd"));
    }

    #[tokio::test]
    async fn test_hit_without_citations_keeps_query() {
        let body = r#"{"results": [{"name_abbreviation": "A v. B"}]}"#;
        let http = Arc::new(FakeHttp::new().respond(CASES, HttpResponse::ok(body)));
        let result = caselaw(http).verify_citation("600 N.W.2d 1").await;
        assert_eq!(result.full_citation, "600 N.W.2d 1");
    }

    #[tokio::test]
    async fn test_bad_body_is_an_error() {
        let http = Arc::new(FakeHttp::new().respond(CASES, HttpResponse::ok("<html>")));
        let result = caselaw(http).verify_citation("2019 ND 12").await;
        assert!(!result.exists);
        assert!(result.error.is_some());
    }
}
