//! Markdown verification appendix appended to a memo.

use std::collections::BTreeMap;

use crate::domain::{CitationKind, VerificationReport};

pub const HEADING: &str = "## Appendix: Citation Verification";

/// Render the appendix for `report`
///
/// Every section ends with a blank line; empty sections are left out.
pub fn render_appendix(report: &VerificationReport) -> String {
    let mut lines = vec![
        String::new(),
        "---".to_string(),
        String::new(),
        HEADING.to_string(),
        String::new(),
        format!("**{}**", report.summary()),
        String::new(),
    ];

    if !report.verified.is_empty() {
        lines.push("### Verified".to_string());
        lines.push(String::new());
        lines.push("| Citation | Name | Source | Link |".to_string());
        lines.push("|---|---|---|---|".to_string());
        for (citation, result) in &report.verified {
            let link = if result.url.is_empty() {
                String::new()
            } else if result.url.starts_with("http") {
                format!("[link]({})", result.url)
            } else {
                format!("`{}`", result.url)
            };
            lines.push(format!(
                "| {} | {} | {} | {} |",
                cell(&citation.normalized),
                cell(&result.name),
                result.source,
                link
            ));
        }
        lines.push(String::new());
    }

    if !report.unverified.is_empty() {
        lines.push("### Unverified".to_string());
        lines.push(String::new());
        lines.push("| Citation | Line | Reason |".to_string());
        lines.push("|---|---|---|".to_string());
        for (citation, result) in &report.unverified {
            let reason = result.error.as_deref().unwrap_or("Not found");
            lines.push(format!(
                "| {} | {} | {} |",
                cell(&citation.normalized),
                citation.line_number,
                cell(reason)
            ));
        }
        lines.push(String::new());
    }

    if !report.skipped.is_empty() {
        let mut by_kind: BTreeMap<CitationKind, Vec<&str>> = BTreeMap::new();
        for citation in &report.skipped {
            let entries = by_kind.entry(citation.kind).or_default();
            if !entries.contains(&citation.raw_text.as_str()) {
                entries.push(&citation.raw_text);
            }
        }

        lines.push("### Not checked".to_string());
        lines.push(String::new());
        for (kind, citations) in by_kind {
            lines.push(format!("- **{}**: {}", kind.label(), citations.join(", ")));
        }
        lines.push(String::new());
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// The memo with trailing whitespace removed and the appendix added
pub fn append_appendix(memo: &str, report: &VerificationReport) -> String {
    format!("{}\n{}", memo.trim_end(), render_appendix(report))
}

fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
