//! Memo citation parser.
//!
//! Scans generated memo text one line at a time and emits a [`Citation`]
//! for every match of every pattern in the library, in line order and then
//! pattern order. Record pincites are reported here as ordinary citations;
//! the rule-citation guard of the record extractor does not apply.

use std::collections::HashSet;

use crate::domain::{Citation, CitationKind};

use super::patterns::{normalize, pattern};

/// Characters of context kept on each side of a match
const CONTEXT_CHARS: usize = 80;

/// Extract every citation occurrence from memo text
pub fn parse_citations(text: &str) -> Vec<Citation> {
    let mut citations = Vec::new();

    for (index, line) in text.split('\n').enumerate() {
        for kind in CitationKind::ALL {
            for caps in pattern(kind).captures_iter(line) {
                let Some(whole) = caps.get(0) else { continue };
                citations.push(Citation {
                    raw_text: whole.as_str().to_string(),
                    kind,
                    normalized: normalize(kind, &caps),
                    context: surrounding(line, whole.start(), whole.end()).to_string(),
                    line_number: index + 1,
                });
            }
        }
    }

    citations
}

/// Unique reporter citations (N.D., N.W.2d, U.S.), first occurrence kept
pub fn extract_unique_case_citations(text: &str) -> Vec<Citation> {
    unique(parse_citations(text), |kind| kind.is_case())
}

/// Unique Century Code citations, first occurrence kept
pub fn extract_unique_statute_citations(text: &str) -> Vec<Citation> {
    unique(parse_citations(text), |kind| kind == CitationKind::Statute)
}

fn unique(citations: Vec<Citation>, keep: impl Fn(CitationKind) -> bool) -> Vec<Citation> {
    let mut seen = HashSet::new();
    citations
        .into_iter()
        .filter(|c| keep(c.kind))
        .filter(|c| seen.insert((c.kind, c.normalized.clone())))
        .collect()
}

/// Up to `CONTEXT_CHARS` characters either side of `start..end`, within the line
fn surrounding(line: &str, start: usize, end: usize) -> &str {
    let from = line[..start]
        .char_indices()
        .rev()
        .nth(CONTEXT_CHARS - 1)
        .map_or(0, |(i, _)| i);
    let to = line[end..]
        .char_indices()
        .nth(CONTEXT_CHARS)
        .map_or(line.len(), |(i, _)| end + i);
    &line[from..to]
}
