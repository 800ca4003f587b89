//! Contract, clause and result types shared across the pipeline.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::DocumentError;
use crate::normalize::normalize_pages;

/// Placeholder written when the model returned nothing usable for a field.
pub const NOT_FOUND: &str = "Not found";

/// Placeholder written when the completion call for a field failed or timed out.
pub const EXTRACTION_FAILED: &str = "Extraction failed";

/// The legal clause types extracted from every contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClauseCategory {
    Termination,
    Confidentiality,
    Liability,
}

impl ClauseCategory {
    /// All categories, in extraction order.
    pub const ALL: [ClauseCategory; 3] = [
        ClauseCategory::Termination,
        ClauseCategory::Confidentiality,
        ClauseCategory::Liability,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Termination => "termination",
            Self::Confidentiality => "confidentiality",
            Self::Liability => "liability",
        }
    }

    /// Parse a category name, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for ClauseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A populated column of a [`ContractResult`] other than its identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultField {
    Summary,
    Clause(ClauseCategory),
}

impl ResultField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Clause(category) => category.as_str(),
        }
    }
}

impl fmt::Display for ResultField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One input contract after text extraction and normalisation.
///
/// Immutable once built: the raw pages are kept for reporting, the normalised
/// text is what every locator and prompt works from.
#[derive(Debug, Clone)]
pub struct ContractDocument {
    id: String,
    pages: Vec<Option<String>>,
    text: String,
}

impl ContractDocument {
    /// Normalise the extracted pages of a contract.
    ///
    /// Fails with [`DocumentError::NoText`] when no page yields any text, since
    /// nothing downstream could produce a meaningful record from it.
    pub fn from_pages(
        id: impl Into<String>,
        pages: Vec<Option<String>>,
    ) -> Result<Self, DocumentError> {
        if pages.is_empty() {
            return Err(DocumentError::NoPages);
        }
        let text = normalize_pages(&pages);
        if text.is_empty() {
            return Err(DocumentError::NoText {
                pages: pages.len(),
            });
        }
        Ok(Self {
            id: id.into(),
            pages,
            text,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn pages(&self) -> &[Option<String>] {
        &self.pages
    }

    /// Number of pages that produced non-blank text.
    pub fn readable_pages(&self) -> usize {
        self.pages
            .iter()
            .filter(|p| p.as_deref().is_some_and(|t| !t.trim().is_empty()))
            .count()
    }

    /// Normalised full text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Derive a contract identifier from its source path (the file stem).
pub fn contract_id(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// The extraction record for one contract.
///
/// Field order here is the column order of the CSV output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractResult {
    pub contract_id: String,
    pub summary: String,
    pub termination: String,
    pub confidentiality: String,
    pub liability: String,
}

impl ContractResult {
    pub fn field(&self, field: ResultField) -> &str {
        match field {
            ResultField::Summary => &self.summary,
            ResultField::Clause(ClauseCategory::Termination) => &self.termination,
            ResultField::Clause(ClauseCategory::Confidentiality) => &self.confidentiality,
            ResultField::Clause(ClauseCategory::Liability) => &self.liability,
        }
    }

    /// True when every field carries text (real content or a placeholder).
    pub fn is_complete(&self) -> bool {
        !self.contract_id.is_empty()
            && [
                &self.summary,
                &self.termination,
                &self.confidentiality,
                &self.liability,
            ]
            .iter()
            .all(|v| !v.trim().is_empty())
    }
}
