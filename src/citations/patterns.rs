//! Pattern library: one regex and one normalization rule per citation kind.
//!
//! Normalized forms are rebuilt from capture groups so that whitespace and
//! trailing punctuation in the source text never leak into the key:
//!
//! | Kind | Example normalized key |
//! |------|------------------------|
//! | N.D. case | `2024 ND 156` |
//! | N.W.2d case | `987 N.W.2d 45` |
//! | U.S. case | `384 U.S. 436` |
//! | Statute | `14-09-06.2(1)(a)` |
//! | Rule | `N.D.R.Civ.P. 12(b)` |
//! | Record | `45:12:¶3` |

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::domain::CitationKind;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid citation pattern {pattern:?}: {e}"))
}

static ND_CASE: LazyLock<Regex> = LazyLock::new(|| compile(r"([0-9]{4})\s+ND\s+([0-9]+)"));

static NW2D_CASE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"([0-9]+)\s+N\.W\.2d\s+([0-9]+)"));

static US_CASE: LazyLock<Regex> = LazyLock::new(|| compile(r"([0-9]+)\s+U\.S\.\s+([0-9]+)"));

static STATUTE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"N\.D\.C\.C\.\s*§{1,2}\s*([0-9][0-9.\-]*(?:\([^)]*\))*)")
});

static RULE_APPELLATE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(N\.D\.R\.App\.P\.)\s*([0-9][0-9.]*)"));

static RULE_CIVIL: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(N\.D\.R\.Civ\.P\.)\s*([0-9][0-9.]*(?:\([^)]*\))*)")
});

static RULE_EVIDENCE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(N\.D\.R\.Ev\.)\s*([0-9][0-9.]*)"));

static RECORD: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\(R([0-9]+)(?::([0-9]+))?(?::¶([0-9]+))?\)"));

static HOME_CITATION: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^([0-9]{4})\s+ND\s+([0-9]+)"));

/// The matching rule for a citation kind
pub fn pattern(kind: CitationKind) -> &'static Regex {
    match kind {
        CitationKind::CaseReporterNd => &*ND_CASE,
        CitationKind::CaseReporterNw2d => &*NW2D_CASE,
        CitationKind::CaseReporterUs => &*US_CASE,
        CitationKind::Statute => &*STATUTE,
        CitationKind::RuleAppellate => &*RULE_APPELLATE,
        CitationKind::RuleCivil => &*RULE_CIVIL,
        CitationKind::RuleEvidence => &*RULE_EVIDENCE,
        CitationKind::RecordReference => &*RECORD,
    }
}

/// Build the canonical lookup key for a match of `pattern(kind)`
pub fn normalize(kind: CitationKind, caps: &Captures<'_>) -> String {
    let group = |i: usize| caps.get(i).map_or("", |m| m.as_str());

    match kind {
        CitationKind::CaseReporterNd => format!("{} ND {}", group(1), group(2)),
        CitationKind::CaseReporterNw2d => format!("{} N.W.2d {}", group(1), group(2)),
        CitationKind::CaseReporterUs => format!("{} U.S. {}", group(1), group(2)),
        CitationKind::Statute => trim_section(group(1)).to_string(),
        CitationKind::RuleAppellate | CitationKind::RuleCivil | CitationKind::RuleEvidence => {
            format!("{} {}", group(1), trim_section(group(2)))
        }
        CitationKind::RecordReference => {
            let mut parts = vec![group(1).to_string()];
            if let Some(page) = caps.get(2) {
                parts.push(page.as_str().to_string());
            }
            if let Some(paragraph) = caps.get(3) {
                parts.push(format!("¶{}", paragraph.as_str()));
            }
            parts.join(":")
        }
    }
}

/// Year and opinion number of a citation that starts "YYYY ND n"
pub fn split_home_citation(citation: &str) -> Option<(&str, &str)> {
    let caps = HOME_CITATION.captures(citation.trim())?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

/// Drop sentence punctuation swallowed by the section-number class
fn trim_section(section: &str) -> &str {
    section.trim_end_matches(['.', '-'])
}
