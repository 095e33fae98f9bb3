//! North Dakota Century Code lookup (ndlegis.gov).
//!
//! A section like `14-09-06.2(1)(a)` is checked by fetching its chapter page
//! (`t14c09.html`) and looking for the base section number. If the chapter
//! page is missing or does not mention it, the site search is tried once.
//! Both requests go through the one-per-second throttle.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::http::{HttpClient, HttpError, HttpRequest};
use super::{cached, CitationSource};
use crate::core::cache::CachePartition;
use crate::core::throttle::Throttle;
use crate::domain::{CitationKind, Source, VerificationResult};

pub const BASE_URL: &str = "https://www.ndlegis.gov";

/// Title, chapter and base section of a Century Code section number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionParts<'a> {
    pub title: &'a str,
    pub chapter: &'a str,
    /// Section without subsection parentheticals
    pub base: &'a str,
}

/// Split "14-09-06.2(1)(a)" into title "14", chapter "09", base "14-09-06.2".
/// `None` when the section has no title-chapter separator.
pub fn split_section(section: &str) -> Option<SectionParts<'_>> {
    let base = section.split('(').next().unwrap_or_default().trim();
    let mut parts = base.split('-');
    let title = parts.next().filter(|t| !t.is_empty())?;
    let chapter = parts.next()?;
    Some(SectionParts {
        title,
        chapter,
        base,
    })
}

/// Century Code scraper
pub struct Statutes {
    base_url: String,
    http: Arc<dyn HttpClient>,
    cache: CachePartition,
    throttle: Throttle,
}

impl Statutes {
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

    /// Verify a normalized section number such as "14-09-06.2(1)(a)"
    pub async fn verify_statute(&self, section: &str) -> VerificationResult {
        let display = format!("N.D.C.C. § {section}");
        let Some(parts) = split_section(section) else {
            debug!(section, "Malformed section number, not looked up");
            return VerificationResult::not_found(Source::StatuteSite, display);
        };

        cached(&self.cache, section, async {
            self.lookup(section, &parts).await.unwrap_or_else(|e| {
                warn!(section, error = %e, "ND statutes lookup failed");
                VerificationResult::failed(Source::StatuteSite, &display, e.to_string())
            })
        })
        .await
    }

    async fn lookup(
        &self,
        section: &str,
        parts: &SectionParts<'_>,
    ) -> Result<VerificationResult, HttpError> {
        let display = format!("N.D.C.C. § {section}");

        let chapter_url = format!(
            "{}/cencode/t{:0>2}c{:0>2}.html",
            self.base_url, parts.title, parts.chapter
        );
        self.throttle.wait().await;
        let chapter = self.http.get(&HttpRequest::get(&chapter_url)).await?;
        if chapter.is_success() && chapter.body.contains(parts.base) {
            return Ok(VerificationResult::found(
                Source::StatuteSite,
                &display,
                &display,
                chapter_url,
            ));
        }

        let search_url = format!("{}/search", self.base_url);
        let query = format!("N.D.C.C. {}", parts.base);
        self.throttle.wait().await;
        let search = self
            .http
            .get(&HttpRequest::get(&search_url).query("q", &query))
            .await?
            .error_for_status(&search_url)?;

        if search.body.contains(parts.base) {
            return Ok(VerificationResult::found(
                Source::StatuteSite,
                &display,
                &display,
                format!("{search_url}?q={}", query.replace(' ', "+")),
            ));
        }

        Ok(VerificationResult::not_found(Source::StatuteSite, display))
    }
}

#[async_trait]
impl CitationSource for Statutes {
    fn name(&self) -> &str {
        "ND Legislature"
    }

    fn source(&self) -> Source {
        Source::StatuteSite
    }

    fn handles(&self, kind: CitationKind) -> bool {
        kind == CitationKind::Statute
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn verify(&self, citation: &str) -> VerificationResult {
        self.verify_statute(citation).await
    }
}
