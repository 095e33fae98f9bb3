//! Record Citation Tests
//!
//! Reduction of brief text to record item numbers, docket detection and the
//! items file handed to the record fetcher.

use std::collections::BTreeSet;

use bench_memo::citations::{
    detect_case_number, extract_record_numbers, format_items_file, format_items_file_dated,
};
use chrono::NaiveDate;

fn set(items: &[u32]) -> BTreeSet<u32> {
    items.iter().copied().collect()
}

fn range(first: u32, last: u32) -> BTreeSet<u32> {
    (first..=last).collect()
}

// ---------------------------------------------------------------------------
// Parenthesized groups
// ---------------------------------------------------------------------------

#[test]
fn test_paren_simple() {
    assert_eq!(extract_record_numbers("(R45)"), set(&[45]));
    assert_eq!(extract_record_numbers("(r45)"), set(&[45]));
}

#[test]
fn test_paren_page_and_paragraph_are_ignored() {
    assert_eq!(extract_record_numbers("(R45:12)"), set(&[45]));
    assert_eq!(extract_record_numbers("(R45:12:¶3)"), set(&[45]));
}

#[test]
fn test_paren_ranges() {
    assert_eq!(extract_record_numbers("(R45-R52)"), range(45, 52));
    assert_eq!(extract_record_numbers("(R45-52)"), range(45, 52));
    assert_eq!(extract_record_numbers("(R45–R52)"), range(45, 52));
}

#[test]
fn test_descending_range_is_two_items() {
    assert_eq!(extract_record_numbers("(R52-R45)"), set(&[45, 52]));
}

#[test]
fn test_paren_lists() {
    assert_eq!(extract_record_numbers("(R12, R14, R16)"), set(&[12, 14, 16]));
    assert_eq!(extract_record_numbers("(R12, 14, 16)"), set(&[12, 14, 16]));
}

#[test]
fn test_paren_prefix_variants() {
    for text in ["(Rec 123)", "(Rec. 123)", "(REC 123)"] {
        assert_eq!(extract_record_numbers(text), set(&[123]), "{text}");
    }
    for text in ["(Idx 45)", "(Idx. 45)"] {
        assert_eq!(extract_record_numbers(text), set(&[45]), "{text}");
    }
}

// ---------------------------------------------------------------------------
// Bare references
// ---------------------------------------------------------------------------

#[test]
fn test_bare_forms() {
    let cases = [
        ("See R45 for details", 45),
        ("R45:12", 45),
        ("R. 123", 123),
        ("R.123", 123),
        ("R: 123", 123),
        ("Rec 123 shows", 123),
        ("Rec. 123 shows", 123),
        ("Idx 45", 45),
        ("Idx. 45", 45),
        ("IDX 45", 45),
        ("r45", 45),
    ];
    for (text, expected) in cases {
        assert_eq!(extract_record_numbers(text), set(&[expected]), "{text}");
    }
}

#[test]
fn test_bare_ranges() {
    assert_eq!(extract_record_numbers("R45-R52 contain"), range(45, 52));
    assert_eq!(extract_record_numbers("R45-52 contain"), range(45, 52));
}

// ---------------------------------------------------------------------------
// Deduplication and ordering
// ---------------------------------------------------------------------------

#[test]
fn test_repeated_item_counted_once() {
    let text = "(R45) and again R45 and (R45:12)";
    assert_eq!(extract_record_numbers(text), set(&[45]));
}

#[test]
fn test_mixed_forms() {
    assert_eq!(
        extract_record_numbers("(R1) (R2) (R3) R4 R5"),
        set(&[1, 2, 3, 4, 5])
    );
}

#[test]
fn test_results_ascend() {
    let numbers = extract_record_numbers("R90, then (R3), then Idx 45");
    let ordered: Vec<u32> = numbers.into_iter().collect();
    assert_eq!(ordered, [3, 45, 90]);
}

// ---------------------------------------------------------------------------
// False positives
// ---------------------------------------------------------------------------

#[test]
fn test_court_rules_are_not_record_items() {
    assert!(!extract_record_numbers("N.D.R.Civ.P. 12(b)").contains(&12));
    assert!(!extract_record_numbers("N.D.R.App.P. 35.1").contains(&35));
    assert!(!extract_record_numbers("N.D.R.Ev. 401").contains(&401));
}

#[test]
fn test_rule_next_to_record_cite() {
    let text = "Under N.D.R.Civ.P. 56, summary judgment was proper (R23:4).";
    assert_eq!(extract_record_numbers(text), set(&[23]));
}

#[test]
fn test_prose_without_citations() {
    assert!(extract_record_numbers("").is_empty());
    assert!(extract_record_numbers("The Record shows that").is_empty());
    assert!(extract_record_numbers("This brief contains no record citations at all.").is_empty());
    assert!(extract_record_numbers("Appellant's Br. 12 argues otherwise").is_empty());
}

// ---------------------------------------------------------------------------
// Range expansion limits
// ---------------------------------------------------------------------------

#[test]
fn test_oversized_range_is_two_items() {
    assert_eq!(extract_record_numbers("(R1-R5000)"), set(&[1, 5000]));
}

#[test]
fn test_full_width_range_is_two_items() {
    let ends = set(&[0, u32::MAX]);
    assert_eq!(extract_record_numbers("(R0-R4294967295)"), ends);
    assert_eq!(extract_record_numbers("R0-4294967295"), ends);
}

#[test]
fn test_largest_expanded_range() {
    assert_eq!(extract_record_numbers("(R1-R1000)").len(), 1000);
}

#[test]
fn test_single_item_range() {
    assert_eq!(extract_record_numbers("(R10-R10)"), set(&[10]));
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[test]
fn test_extraction_is_idempotent_over_items_output() {
    let text = "(R45:12:¶3), R. 7-9, and (Rec 200; Idx 3)";
    let first = extract_record_numbers(text);

    let rendered: Vec<String> = first.iter().map(|n| format!("R{n}")).collect();
    let second = extract_record_numbers(&rendered.join(" "));

    assert_eq!(first, second);
}

#[test]
fn test_concatenation_is_union() {
    let a = "(R1-R3) and R10";
    let b = "Idx 10, (R40:2)";
    let joined = extract_record_numbers(&format!("{a}\n{b}"));

    let union: BTreeSet<u32> = extract_record_numbers(a)
        .union(&extract_record_numbers(b))
        .copied()
        .collect();
    assert_eq!(joined, union);
}

// ---------------------------------------------------------------------------
// Case number detection
// ---------------------------------------------------------------------------

#[test]
fn test_labeled_case_numbers() {
    assert_eq!(detect_case_number("Case No. 20260123"), "20260123");
    assert_eq!(detect_case_number("Case Number: 20260123"), "20260123");
    assert_eq!(detect_case_number("No. 20260123"), "20260123");
    assert_eq!(
        detect_case_number("Case No. 54-2020-CV-00012"),
        "54-2020-CV-00012"
    );
}

#[test]
fn test_bare_docket_fallback() {
    assert_eq!(
        detect_case_number("Supreme Court 20260123 State v. Smith"),
        "20260123"
    );
}

#[test]
fn test_no_case_number() {
    assert_eq!(detect_case_number("No case number here"), "");
}

// ---------------------------------------------------------------------------
// Items file
// ---------------------------------------------------------------------------

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 18).unwrap()
}

#[test]
fn test_items_file_layout() {
    let items = format_items_file_dated(
        &set(&[3, 1, 2]),
        &["brief.pdf".to_string()],
        "20260123",
        date(),
    );
    let lines: Vec<&str> = items.trim_end().split('\n').collect();

    assert_eq!(
        lines,
        [
            "# Record citations extracted from briefs",
            "# Case: 20260123",
            "# Source: brief.pdf",
            "# Date: 2026-02-18",
            "# Total unique items: 3",
            "R1",
            "R2",
            "R3",
        ]
    );
    assert!(items.ends_with("R3\n"));
}

#[test]
fn test_items_file_without_case_number() {
    let items = format_items_file_dated(&set(&[1]), &["brief.pdf".to_string()], "", date());
    assert!(!items.contains("Case:"));
    assert!(items.contains("# Source: brief.pdf\n# Date: 2026-02-18\n"));
}

#[test]
fn test_items_file_lists_every_source() {
    let sources = ["a.pdf".to_string(), "b.pdf".to_string()];
    let items = format_items_file(&set(&[1]), &sources, "");
    assert!(items.contains("# Source: a.pdf, b.pdf\n"));
}

#[test]
fn test_items_file_with_no_items() {
    let items = format_items_file(&BTreeSet::new(), &["brief.pdf".to_string()], "");
    assert!(items.contains("# Total unique items: 0"));
    assert!(!items.contains("\nR"));
}
