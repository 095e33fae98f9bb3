//! Brief-side CLI subcommands.
//!
//! - `extract-cites`: Reduce the record citations in a set of briefs to an
//!   items file for the record fetcher
//! - `classify`: Show what each case document appears to be

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::{debug, warn};

use crate::citations::{detect_case_number, extract_record_numbers_from_pages, format_items_file};
use crate::ingest::{classify, extractor_for};

/// Extensions picked up when a directory is given
const INPUT_EXTENSIONS: [&str; 3] = ["pdf", "txt", "md"];

/// A single directory expands to its briefs; anything else is taken as-is
fn expand_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    if let [dir] = inputs {
        if dir.is_dir() {
            let mut files = Vec::new();
            for extension in INPUT_EXTENSIONS {
                let pattern = dir.join(format!("*.{extension}"));
                let pattern = pattern.to_string_lossy();
                for entry in glob::glob(&pattern).context("Invalid input pattern")? {
                    files.push(entry.context("Failed to read input directory")?);
                }
            }
            files.sort();
            return Ok(files);
        }
    }

    for input in inputs {
        if !input.is_file() {
            bail!("{} is not a file", input.display());
        }
    }
    Ok(inputs.to_vec())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Leading digits of a clerk-style filename ("20250305_State-v-Doe_Apt-Br.pdf")
fn case_number_from_filename(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_string_lossy();
    let digits: String = stem.chars().take_while(|c| c.is_ascii_digit()).collect();
    (!digits.is_empty()).then_some(digits)
}

/// Extract record citations from briefs
pub async fn extract_cites(
    inputs: &[PathBuf],
    output: Option<PathBuf>,
    case_number: Option<String>,
) -> Result<()> {
    let files = expand_inputs(inputs)?;
    if files.is_empty() {
        bail!("No brief files found");
    }

    let mut numbers = BTreeSet::new();
    let mut sources = Vec::new();
    let mut detected = String::new();

    eprintln!("Found {} file(s):\n", files.len());
    for path in &files {
        let extractor = extractor_for(path)?;
        let pages = extractor
            .extract_pages(path)
            .await
            .with_context(|| format!("Failed to extract text from {}", path.display()))?;

        let name = file_name(path);
        let first_page = pages.first().map(|(_, text)| text.as_str()).unwrap_or_default();
        let doc_type = classify(&name, first_page);
        let found = extract_record_numbers_from_pages(&pages);
        debug!(file = %name, pages = pages.len(), items = found.len(), "Scanned");
        eprintln!("  {}: {} record items ({})", name, found.len(), doc_type);
        if !doc_type.is_brief() {
            warn!(file = %name, doc_type = %doc_type, "Input does not look like a brief");
        }

        if detected.is_empty() {
            detected = pages
                .iter()
                .map(|(_, text)| detect_case_number(text))
                .find(|n| !n.is_empty())
                .unwrap_or_default();
        }

        numbers.extend(found);
        sources.push(name);
    }

    let case_number = case_number
        .or_else(|| (!detected.is_empty()).then_some(detected))
        .or_else(|| files.first().and_then(|p| case_number_from_filename(p)))
        .unwrap_or_default();

    let items = format_items_file(&numbers, &sources, &case_number);
    match output {
        Some(path) => {
            tokio::fs::write(&path, &items)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("\n✓ {} unique record items written to {}", numbers.len(), path.display());
        }
        None => print!("{}", items),
    }

    Ok(())
}

/// Print the detected type of each document
pub async fn classify_files(files: &[PathBuf]) -> Result<()> {
    println!("{:<50} {:<16}", "FILE", "TYPE");
    println!("{}", "-".repeat(66));

    for path in files {
        let name = file_name(path);
        let text = match extractor_for(path) {
            Ok(extractor) => extractor.extract(path).await.unwrap_or_else(|e| {
                debug!(file = %name, error = %e, "Classifying by filename only");
                String::new()
            }),
            Err(_) => String::new(),
        };
        println!("{:<50} {:<16}", name, classify(&name, &text));
    }

    Ok(())
}
