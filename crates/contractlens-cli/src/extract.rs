//! Extraction pipeline: PDF pages → normalised text → located excerpts →
//! four completion calls → one result record per contract.
//!
//! Documents are processed strictly one after another, and within a document
//! the calls run in a fixed order: termination, confidentiality, liability,
//! then the summary. Failures are absorbed where they happen: a bad field
//! becomes a placeholder, a bad document becomes a [`DocumentFailure`].

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use contractlens_ai::{CompletionError, CompletionService};
use contractlens_core::{
    ClauseCategory, ContractDocument, ContractResult, DocumentError, EXTRACTION_FAILED, NOT_FOUND,
    PageSource, Prompt, PromptBuilder, ResultField, SectionLocator, contract_id,
};
use contractlens_store::ResultSink;
use tracing::{debug, info, warn};

/// A document that was skipped, and why.
#[derive(Debug)]
pub struct DocumentFailure {
    pub contract_id: String,
    pub path: PathBuf,
    pub error: DocumentError,
}

pub struct BatchReport {
    pub total: usize,
    pub processed: usize,
    pub failures: Vec<DocumentFailure>,
    /// Fields filled with a placeholder across all processed documents.
    pub placeholders: usize,
    pub fallback_excerpts: usize,
    pub elapsed_secs: f64,
}

/// Per-document field outcome counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct FieldStats {
    placeholders: usize,
    fallbacks: usize,
}

/// Drives documents through location, prompting and completion.
pub struct ClauseExtractor<P, C> {
    source: P,
    completion: C,
    locator: SectionLocator,
    prompts: PromptBuilder,
    call_timeout: Duration,
}

impl<P: PageSource, C: CompletionService> ClauseExtractor<P, C> {
    pub fn new(
        source: P,
        completion: C,
        locator: SectionLocator,
        prompts: PromptBuilder,
        call_timeout: Duration,
    ) -> Self {
        Self {
            source,
            completion,
            locator,
            prompts,
            call_timeout,
        }
    }

    /// Run every document in `paths` and push the records into `sink`.
    pub async fn run_batch(&self, paths: &[PathBuf], sink: &mut ResultSink) -> BatchReport {
        let start = Instant::now();
        let total = paths.len();
        let mut failures = Vec::new();
        let mut placeholders = 0usize;
        let mut fallback_excerpts = 0usize;

        for (i, path) in paths.iter().enumerate() {
            let id = contract_id(path);
            eprintln!("  [{}/{total}] {id}", i + 1);

            match self.load_document(path) {
                Ok(doc) => {
                    let (result, stats) = self.extract_document(&doc).await;
                    placeholders += stats.placeholders;
                    fallback_excerpts += stats.fallbacks;
                    sink.push(result);
                }
                Err(error) => {
                    warn!(contract = %id, path = %path.display(), error = %error, "skipping document");
                    failures.push(DocumentFailure {
                        contract_id: id,
                        path: path.clone(),
                        error,
                    });
                }
            }
        }

        let report = BatchReport {
            total,
            processed: total - failures.len(),
            failures,
            placeholders,
            fallback_excerpts,
            elapsed_secs: start.elapsed().as_secs_f64(),
        };
        info!(
            total = report.total,
            processed = report.processed,
            failed = report.failures.len(),
            placeholders = report.placeholders,
            "batch complete"
        );
        report
    }

    /// Extract and normalise one file.
    pub fn load_document(&self, path: &Path) -> Result<ContractDocument, DocumentError> {
        let pages = self.source.read_pages(path)?;
        ContractDocument::from_pages(contract_id(path), pages)
    }

    /// Produce the record for one document. Never fails: every field ends up
    /// with extracted text or a placeholder.
    async fn extract_document(&self, doc: &ContractDocument) -> (ContractResult, FieldStats) {
        let mut stats = FieldStats::default();

        let termination = self
            .extract_clause(doc, ClauseCategory::Termination, &mut stats)
            .await;
        let confidentiality = self
            .extract_clause(doc, ClauseCategory::Confidentiality, &mut stats)
            .await;
        let liability = self
            .extract_clause(doc, ClauseCategory::Liability, &mut stats)
            .await;

        let prompt = self.prompts.summary(doc.text());
        let summary = self
            .complete_field(doc.id(), ResultField::Summary, &prompt, &mut stats)
            .await;

        let result = ContractResult {
            contract_id: doc.id().to_string(),
            summary,
            termination,
            confidentiality,
            liability,
        };
        (result, stats)
    }

    async fn extract_clause(
        &self,
        doc: &ContractDocument,
        category: ClauseCategory,
        stats: &mut FieldStats,
    ) -> String {
        let section = self.locator.locate(doc.text(), category);
        if section.is_fallback() {
            stats.fallbacks += 1;
        }
        debug!(
            contract = doc.id(),
            category = %category,
            confidence = %section.confidence,
            rank = ?section.rank,
            chars = section.excerpt.chars().count(),
            "located section"
        );
        let prompt = self.prompts.clause(category, &section.excerpt);
        self.complete_field(doc.id(), ResultField::Clause(category), &prompt, stats)
            .await
    }

    /// One bounded completion call, with failures mapped to placeholders.
    async fn complete_field(
        &self,
        contract: &str,
        field: ResultField,
        prompt: &Prompt,
        stats: &mut FieldStats,
    ) -> String {
        let call = self.completion.complete(field, prompt);
        let outcome = match tokio::time::timeout(self.call_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(CompletionError::Timeout(self.call_timeout)),
        };

        match outcome {
            Ok(text) => match clean_completion(&text) {
                Some(clean) => clean,
                None => {
                    info!(contract, field = %field, "no usable text in completion");
                    stats.placeholders += 1;
                    NOT_FOUND.to_string()
                }
            },
            Err(e) => {
                warn!(contract, field = %field, error = %e, "completion failed");
                stats.placeholders += 1;
                EXTRACTION_FAILED.to_string()
            }
        }
    }
}

/// Strip wrappers models put around verbatim text. `None` when nothing is left.
fn clean_completion(raw: &str) -> Option<String> {
    let mut text = raw.trim();

    if let Some(inner) = text.strip_prefix("```") {
        // Drop an optional language tag on the opening fence line.
        let inner = match inner.find('\n') {
            Some(nl) if !inner[..nl].contains(' ') => &inner[nl + 1..],
            _ => inner,
        };
        text = inner.strip_suffix("```").unwrap_or(inner).trim();
    }
    if let Some(inner) = text
        .strip_prefix("\"\"\"")
        .and_then(|t| t.strip_suffix("\"\"\""))
    {
        text = inner.trim();
    }
    if text == "\"\"" || text == "''" {
        return None;
    }

    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
