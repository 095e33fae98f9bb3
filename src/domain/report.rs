//! Aggregate verification report for a memo.

use serde::{Deserialize, Serialize};

use super::citation::Citation;
use super::verification::VerificationResult;

/// Results of verifying every citation in a memo
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerificationReport {
    /// Citations a source confirmed, in check order
    pub verified: Vec<(Citation, VerificationResult)>,

    /// Citations no source confirmed, in check order
    pub unverified: Vec<(Citation, VerificationResult)>,

    /// Record references and rule citations (never checked online)
    pub skipped: Vec<Citation>,

    /// Number of citations actually checked (verified + unverified)
    pub total_checked: usize,
}

impl VerificationReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// File a checked citation under verified or unverified
    pub fn record(&mut self, citation: Citation, result: VerificationResult) {
        self.total_checked += 1;
        if result.exists {
            self.verified.push((citation, result));
        } else {
            self.unverified.push((citation, result));
        }
    }

    /// File a citation that is not checked
    pub fn skip(&mut self, citation: Citation) {
        self.skipped.push(citation);
    }

    /// One-line summary, e.g. "Verified: 3 | Unverified: 1 | Skipped: 4 | Total: 4"
    pub fn summary(&self) -> String {
        format!(
            "Verified: {} | Unverified: {} | Skipped: {} | Total: {}",
            self.verified.len(),
            self.unverified.len(),
            self.skipped.len(),
            self.total_checked
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CitationKind, Source};

    fn cite(kind: CitationKind, normalized: &str) -> Citation {
        Citation {
            raw_text: normalized.to_string(),
            kind,
            normalized: normalized.to_string(),
            context: String::new(),
            line_number: 1,
        }
    }

    #[test]
    fn test_record_splits_by_exists() {
        let mut report = VerificationReport::new();
        report.record(
            cite(CitationKind::CaseReporterNd, "2024 ND 1"),
            VerificationResult::found(Source::Local, "", "2024 ND 1", ""),
        );
        report.record(
            cite(CitationKind::CaseReporterNd, "2024 ND 2"),
            VerificationResult::not_found(Source::CourtSite, "2024 ND 2"),
        );
        report.skip(cite(CitationKind::RecordReference, "45"));

        assert_eq!(report.verified.len(), 1);
        assert_eq!(report.unverified.len(), 1);
        assert!(report.verified.iter().all(|(_, r)| r.exists));
        assert!(report.unverified.iter().all(|(_, r)| !r.exists));
        assert_eq!(
            report.summary(),
            "Verified: 1 | Unverified: 1 | Skipped: 1 | Total: 2"
        );
    }

    #[test]
    fn test_empty_summary() {
        assert_eq!(
            VerificationReport::new().summary(),
            "Verified: 0 | Unverified: 0 | Skipped: 0 | Total: 0"
        );
    }
}
