use std::path::PathBuf;

use thiserror::Error;

use crate::contract::ClauseCategory;

/// Why a contract could not be turned into text. The document is skipped.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("unreadable PDF: {0}")]
    Unreadable(String),

    #[error("document has no pages")]
    NoPages,

    #[error("no extractable text in {pages} page(s)")]
    NoText { pages: usize },
}

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("pattern file not readable: {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("pattern config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid {category} pattern at rank {rank}: {source}")]
    Category {
        category: ClauseCategory,
        rank: usize,
        source: regex::Error,
    },

    #[error("invalid section boundary pattern: {0}")]
    Boundary(regex::Error),
}
