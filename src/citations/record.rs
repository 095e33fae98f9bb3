//! Record citation extraction for appellate briefs.
//!
//! Reduces references like `(R45)`, `(R45:12:¶3)`, `(R45-R52)`,
//! `(R12, 14, 16)`, `R. 123`, `Rec 123` and `Idx. 45` to a deduplicated set
//! of record item numbers, so only the cited record items need fetching.
//!
//! Extraction runs in two phases and the order matters:
//!
//! 1. Parenthesized groups. Each group is split into segments; a segment is
//!    either a range or a single item whose page/paragraph sub-references
//!    (everything after the first colon) are ignored.
//! 2. Bare references outside the spans consumed by phase 1. A bare prefix
//!    directly preceded by a letter or a period is not a record prefix: this
//!    keeps the `R` of "N.D.R.Civ.P." and words like "for 12" out of the set.
//!
//! Multi-case citations ("54-2020-CV-00012 R19:2") yield the record number
//! only; the docket number is not associated with it.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use chrono::{Local, NaiveDate};
use regex::Regex;

use crate::domain::{CitationKind, RecordCitation};

use super::patterns;

/// Ranges longer than this are treated as two single items (OCR garbage guard)
pub const MAX_RANGE_SIZE: u32 = 1000;

const PREFIX: &str = r"(?:Rec|Idx|R)\.?\s*:?\s*";

static PAREN_GROUP: LazyLock<Regex> =
    LazyLock::new(|| compile(&format!(r"(?i)\(\s*{PREFIX}[0-9][^)]*\)")));

static STRIP_PREFIX: LazyLock<Regex> = LazyLock::new(|| compile(&format!(r"(?i)^\s*{PREFIX}")));

static INNER_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(r"(?i)^([0-9]+)\s*[-–—]\s*(?:{PREFIX})?([0-9]+)"))
});

static INNER_NUM: LazyLock<Regex> = LazyLock::new(|| compile(r"[0-9]+"));

static BARE: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r"(?i){PREFIX}([0-9]+)(?:\s*[-–—]\s*(?:{PREFIX})?([0-9]+))?"
    ))
});

static CASE_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"(?i)(?:Case\s+(?:No\.?|Number)\s*:?\s*|No\.\s*)([0-9]{8}|[0-9]{2}-[0-9]{4}-[A-Z]{2,4}-[0-9]+)",
    )
});

static DOCKET_NUMBER: LazyLock<Regex> = LazyLock::new(|| compile(r"\b(20[0-9]{6})\b"));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid record pattern {pattern:?}: {e}"))
}

/// Return the deduplicated set of record item numbers cited in `text`
pub fn extract_record_numbers(text: &str) -> BTreeSet<u32> {
    let mut numbers = BTreeSet::new();

    // Phase 1: parenthesized groups
    let mut consumed: Vec<(usize, usize)> = Vec::new();
    for group in PAREN_GROUP.find_iter(text) {
        extract_from_paren_group(group.as_str(), &mut numbers);
        consumed.push((group.start(), group.end()));
    }

    // Phase 2: bare references
    let mut pos = 0;
    while let Some(caps) = BARE.captures_at(text, pos) {
        let Some(whole) = caps.get(0) else { break };
        let start = whole.start();

        if follows_word_or_period(text, start) {
            // Not a prefix here; a later prefix inside this match may still be
            pos = start + text[start..].chars().next().map_or(1, char::len_utf8);
            continue;
        }
        pos = whole.end();

        if consumed.iter().any(|&(s, e)| s <= start && start < e) {
            continue;
        }

        let Some(first) = parse_number(caps.get(1).map(|m| m.as_str())) else {
            continue;
        };
        match caps.get(2) {
            Some(end) => match parse_number(Some(end.as_str())) {
                Some(last) => expand_range(first, last, &mut numbers),
                None => {
                    numbers.insert(first);
                }
            },
            None => {
                numbers.insert(first);
            }
        }
    }

    numbers
}

/// Union of record numbers over `(page_number, page_text)` pairs
pub fn extract_record_numbers_from_pages(pages: &[(u32, String)]) -> BTreeSet<u32> {
    pages
        .iter()
        .flat_map(|(_, text)| extract_record_numbers(text))
        .collect()
}

/// Parenthesized `(R<n>[:<page>][:¶<para>])` references with their sub-references
pub fn extract_record_citations(text: &str) -> Vec<RecordCitation> {
    patterns::pattern(CitationKind::RecordReference)
        .captures_iter(text)
        .filter_map(|caps| {
            let record_number = parse_number(caps.get(1).map(|m| m.as_str()))?;
            Some(RecordCitation {
                raw_text: caps.get(0)?.as_str().to_string(),
                record_number,
                page: parse_number(caps.get(2).map(|m| m.as_str())),
                paragraph: parse_number(caps.get(3).map(|m| m.as_str())),
            })
        })
        .collect()
}

/// Best-effort docket number: a labeled "Case No." first, then a bare
/// 8-digit token starting with "20". Empty when neither is present.
pub fn detect_case_number(text: &str) -> String {
    CASE_NUMBER
        .captures(text)
        .or_else(|| DOCKET_NUMBER.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Items file for the record fetcher, dated today
pub fn format_items_file(
    numbers: &BTreeSet<u32>,
    source_files: &[String],
    case_number: &str,
) -> String {
    format_items_file_dated(numbers, source_files, case_number, Local::now().date_naive())
}

/// Items file with an explicit date line.
///
/// Layout: header comment, optional `# Case:` line, source list, date,
/// count, then one `R<n>` line per item in ascending order.
pub fn format_items_file_dated(
    numbers: &BTreeSet<u32>,
    source_files: &[String],
    case_number: &str,
    date: NaiveDate,
) -> String {
    let mut lines = vec!["# Record citations extracted from briefs".to_string()];
    if !case_number.is_empty() {
        lines.push(format!("# Case: {}", case_number));
    }
    lines.push(format!("# Source: {}", source_files.join(", ")));
    lines.push(format!("# Date: {}", date.format("%Y-%m-%d")));
    lines.push(format!("# Total unique items: {}", numbers.len()));
    lines.extend(numbers.iter().map(|n| format!("R{}", n)));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Pull every record number out of one parenthesized group
fn extract_from_paren_group(group: &str, numbers: &mut BTreeSet<u32>) {
    let interior = group.trim();
    let interior = interior.strip_prefix('(').unwrap_or(interior);
    let interior = interior.strip_suffix(')').unwrap_or(interior);

    for segment in interior.split([',', ';']) {
        let segment = STRIP_PREFIX.replace(segment.trim(), "");

        if let Some(caps) = INNER_RANGE.captures(&segment) {
            let first = parse_number(caps.get(1).map(|m| m.as_str()));
            let last = parse_number(caps.get(2).map(|m| m.as_str()));
            if let (Some(first), Some(last)) = (first, last) {
                expand_range(first, last, numbers);
            }
            continue;
        }

        // (R45:12:¶3) cites item 45; 12 and ¶3 are page and paragraph
        let item = segment.split(':').next().unwrap_or_default();
        if let Some(n) = INNER_NUM
            .find(item)
            .and_then(|m| parse_number(Some(m.as_str())))
        {
            numbers.insert(n);
        }
    }
}

/// Expand an ascending range; descending or oversized ranges become two items
fn expand_range(first: u32, last: u32, numbers: &mut BTreeSet<u32>) {
    // Span minus one, so 0..=u32::MAX cannot overflow
    let oversized = last.checked_sub(first).map_or(true, |d| d >= MAX_RANGE_SIZE);
    if oversized {
        numbers.insert(first);
        numbers.insert(last);
    } else {
        numbers.extend(first..=last);
    }
}

fn follows_word_or_period(text: &str, start: usize) -> bool {
    text[..start]
        .chars()
        .next_back()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '.')
}

fn parse_number(digits: Option<&str>) -> Option<u32> {
    digits?.parse().ok()
}
