//! Memo Parser Tests
//!
//! Citation recognition and normalization over generated memo text.

use bench_memo::citations::{
    extract_unique_case_citations, extract_unique_statute_citations, parse_citations,
};
use bench_memo::CitationKind;

fn single(text: &str) -> (CitationKind, String) {
    let cites = parse_citations(text);
    assert_eq!(cites.len(), 1, "expected one citation in {text:?}: {cites:?}");
    (cites[0].kind, cites[0].normalized.clone())
}

#[test]
fn test_case_reporters() {
    assert_eq!(
        single("State v. Doe, 2024 ND 156, ¶ 12."),
        (CitationKind::CaseReporterNd, "2024 ND 156".to_string())
    );
    assert_eq!(
        single("Smith v. Jones, 987  N.W.2d\t45 (N.D. 2023)"),
        (CitationKind::CaseReporterNw2d, "987 N.W.2d 45".to_string())
    );
    assert_eq!(
        single("Miranda v. Arizona, 384 U.S. 436 (1966)"),
        (CitationKind::CaseReporterUs, "384 U.S. 436".to_string())
    );
}

#[test]
fn test_statutes_keep_subsections_and_drop_punctuation() {
    assert_eq!(
        single("See N.D.C.C. § 14-09-06.2(1)(a)."),
        (CitationKind::Statute, "14-09-06.2(1)(a)".to_string())
    );
    assert_eq!(
        single("under N.D.C.C. §§ 12.1-32-02."),
        (CitationKind::Statute, "12.1-32-02".to_string())
    );
    assert_eq!(
        single("N.D.C.C.§27-20.3-01"),
        (CitationKind::Statute, "27-20.3-01".to_string())
    );
}

#[test]
fn test_court_rules() {
    assert_eq!(
        single("Summary judgment under N.D.R.Civ.P. 56(c) is reviewed de novo."),
        (CitationKind::RuleCivil, "N.D.R.Civ.P. 56(c)".to_string())
    );
    assert_eq!(
        single("Timely under N.D.R.App.P. 35.1."),
        (CitationKind::RuleAppellate, "N.D.R.App.P. 35.1".to_string())
    );
    assert_eq!(
        single("Relevance, N.D.R.Ev. 401."),
        (CitationKind::RuleEvidence, "N.D.R.Ev. 401".to_string())
    );
}

#[test]
fn test_rule_is_never_a_record_reference() {
    let (kind, normalized) = single("N.D.R.Civ.P. 12(b)");
    assert_eq!(kind, CitationKind::RuleCivil);
    assert_eq!(normalized, "N.D.R.Civ.P. 12(b)");
}

#[test]
fn test_record_references() {
    let cites = parse_citations("The court found (R45:12:¶3), (R45:12) and (R7).");
    let keys: Vec<_> = cites.iter().map(|c| c.normalized.as_str()).collect();
    assert_eq!(keys, ["45:12:¶3", "45:12", "7"]);
    assert!(cites.iter().all(|c| c.kind == CitationKind::RecordReference));
}

#[test]
fn test_order_is_line_then_pattern() {
    let memo = "See (R4) and 2024 ND 1.\nThen 384 U.S. 436 and 2023 ND 2.";
    let cites = parse_citations(memo);
    let seen: Vec<_> = cites
        .iter()
        .map(|c| (c.line_number, c.normalized.as_str()))
        .collect();

    assert_eq!(
        seen,
        [
            (1, "2024 ND 1"),
            (1, "4"),
            (2, "2023 ND 2"),
            (2, "384 U.S. 436"),
        ]
    );
}

#[test]
fn test_raw_text_and_context() {
    let memo = "First line mentions nothing.\nThe majority in Doe, 2024 ND 156, held otherwise.\nLast.";
    let cites = parse_citations(memo);

    assert_eq!(cites.len(), 1);
    assert_eq!(cites[0].raw_text, "2024 ND 156");
    assert_eq!(cites[0].line_number, 2);
    assert_eq!(
        cites[0].context,
        "The majority in Doe, 2024 ND 156, held otherwise."
    );
}

#[test]
fn test_every_occurrence_is_reported() {
    let cites = parse_citations("2024 ND 1; 2024 ND 1; 2024 ND 1");
    assert_eq!(cites.len(), 3);
}

#[test]
fn test_unique_filters() {
    let memo = "\
Doe, 2024 ND 156; Smith, 987 N.W.2d 45.
Doe, 2024 ND 156, again. N.D.C.C. § 14-09-06.2 and N.D.C.C. § 14-09-06.2.
N.D.R.Civ.P. 56; (R3).
";
    let cases: Vec<_> = extract_unique_case_citations(memo)
        .into_iter()
        .map(|c| c.normalized)
        .collect();
    assert_eq!(cases, ["2024 ND 156", "987 N.W.2d 45"]);

    let statutes = extract_unique_statute_citations(memo);
    assert_eq!(statutes.len(), 1);
    assert_eq!(statutes[0].normalized, "14-09-06.2");
    assert_eq!(statutes[0].line_number, 2);
}

#[test]
fn test_plain_prose_has_no_citations() {
    assert!(parse_citations("").is_empty());
    assert!(parse_citations("The district court did not err.\nAffirmed.").is_empty());
}
