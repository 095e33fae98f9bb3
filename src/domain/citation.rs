//! Citation types produced by the parsers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of citation, one per pattern in the pattern library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CitationKind {
    /// North Dakota public-domain cite, e.g. "2024 ND 156"
    CaseReporterNd,
    /// North Western Reporter, e.g. "987 N.W.2d 45"
    CaseReporterNw2d,
    /// United States Reports, e.g. "384 U.S. 436"
    CaseReporterUs,
    /// North Dakota Century Code section
    Statute,
    /// N.D.R.App.P.
    RuleAppellate,
    /// N.D.R.Civ.P.
    RuleCivil,
    /// N.D.R.Ev.
    RuleEvidence,
    /// In-record pincite, e.g. "(R45:12:¶3)"
    RecordReference,
}

impl CitationKind {
    /// All kinds, in pattern application order
    pub const ALL: [CitationKind; 8] = [
        CitationKind::CaseReporterNd,
        CitationKind::CaseReporterNw2d,
        CitationKind::CaseReporterUs,
        CitationKind::Statute,
        CitationKind::RuleAppellate,
        CitationKind::RuleCivil,
        CitationKind::RuleEvidence,
        CitationKind::RecordReference,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CitationKind::CaseReporterNd => "case-reporter-nd",
            CitationKind::CaseReporterNw2d => "case-reporter-nw2d",
            CitationKind::CaseReporterUs => "case-reporter-us",
            CitationKind::Statute => "statute",
            CitationKind::RuleAppellate => "rule-appellate",
            CitationKind::RuleCivil => "rule-civil",
            CitationKind::RuleEvidence => "rule-evidence",
            CitationKind::RecordReference => "record-reference",
        }
    }

    /// Human-readable label used in the appendix
    pub fn label(&self) -> &'static str {
        match self {
            CitationKind::CaseReporterNd => "N.D. case",
            CitationKind::CaseReporterNw2d => "N.W.2d case",
            CitationKind::CaseReporterUs => "U.S. case",
            CitationKind::Statute => "N.D.C.C.",
            CitationKind::RuleAppellate => "N.D.R.App.P.",
            CitationKind::RuleCivil => "N.D.R.Civ.P.",
            CitationKind::RuleEvidence => "N.D.R.Ev.",
            CitationKind::RecordReference => "Record",
        }
    }

    /// Reporter citations checked against case-law sources
    pub fn is_case(self) -> bool {
        matches!(
            self,
            CitationKind::CaseReporterNd
                | CitationKind::CaseReporterNw2d
                | CitationKind::CaseReporterUs
        )
    }

    pub fn is_rule(self) -> bool {
        matches!(
            self,
            CitationKind::RuleAppellate | CitationKind::RuleCivil | CitationKind::RuleEvidence
        )
    }

    /// Kinds with no authoritative online source; never verified
    pub fn is_skipped(self) -> bool {
        self.is_rule() || self == CitationKind::RecordReference
    }

    /// The jurisdiction's own reporter format
    pub fn is_home_reporter(self) -> bool {
        self == CitationKind::CaseReporterNd
    }
}

impl fmt::Display for CitationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A citation occurrence in memo text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    /// Text exactly as matched
    pub raw_text: String,

    /// Which pattern matched
    pub kind: CitationKind,

    /// Canonical lookup key (cache and dedup key)
    pub normalized: String,

    /// Up to 80 characters either side of the match, clipped to the line
    pub context: String,

    /// 1-indexed line number
    pub line_number: usize,
}

impl Citation {
    /// Identity used for deduplication
    pub fn key(&self) -> (CitationKind, &str) {
        (self.kind, self.normalized.as_str())
    }
}

/// A reference into the trial-court record.
///
/// Only `record_number` identifies the item; page and paragraph are kept
/// for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordCitation {
    pub raw_text: String,
    pub record_number: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paragraph: Option<u32>,
}
