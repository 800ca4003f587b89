//! Human-readable reports for the terminal.
//!
//! Progress and run summaries go to stderr; `locate` and `patterns` output,
//! which users may pipe elsewhere, goes to stdout.

use std::path::Path;

use contractlens_core::{SectionMatch, truncate_chars};
use contractlens_store::SinkReport;

use crate::extract::BatchReport;

const PREVIEW_CHARS: usize = 400;

// ── Extraction run ──

/// Print the end-of-run counts and any skipped documents.
pub fn print_batch_report(report: &BatchReport) {
    eprintln!();
    eprintln!("Extraction");
    eprintln!("  {:<26} {}", "documents", report.total);
    eprintln!("  {:<26} {}", "processed", report.processed);
    eprintln!("  {:<26} {}", "failed", report.failures.len());
    eprintln!("  {:<26} {}", "placeholder fields", report.placeholders);
    eprintln!("  {:<26} {}", "fallback excerpts", report.fallback_excerpts);
    eprintln!("  {:<26} {:.1}s", "elapsed", report.elapsed_secs);

    if !report.failures.is_empty() {
        eprintln!();
        eprintln!("Skipped");
        for failure in &report.failures {
            eprintln!("  {:<26} {}", failure.contract_id, failure.error);
            eprintln!("  {:<26} {}", "", failure.path.display());
        }
    }
}

/// Print where each output went, or why it was not written.
pub fn print_sink_report(report: &SinkReport, json: &Path, csv: &Path) {
    eprintln!();
    eprintln!("Outputs");
    for (label, path, outcome) in [("json", json, &report.json), ("csv", csv, &report.csv)] {
        match outcome {
            Ok(()) => eprintln!("  {:<26} {}", label, path.display()),
            Err(e) => eprintln!("  {:<26} FAILED: {e}", label),
        }
    }
}

// ── Inspection ──

/// Print one located section as a small card.
pub fn print_section_match(contract_id: &str, section: &SectionMatch) {
    println!("=== {contract_id} / {} ===", section.category);
    println!("  {:<26} {}", "confidence", section.confidence);
    if let Some(rank) = section.rank {
        println!("  {:<26} {}", "pattern rank", rank);
    }
    if let Some(offset) = section.offset {
        println!("  {:<26} {}", "offset", offset);
    }
    println!("  {:<26} {}", "chars", section.excerpt.chars().count());
    println!();

    let preview = truncate_chars(&section.excerpt, PREVIEW_CHARS);
    for line in preview.lines() {
        println!("    {line}");
    }
    if preview.len() < section.excerpt.len() {
        println!("    ...");
    }
    println!();
}
