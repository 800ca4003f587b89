//! The completion service seam.

use std::time::Duration;

use async_trait::async_trait;
use contractlens_core::{Prompt, ResultField};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("response contained no choices")]
    NoChoices,
    #[error("no response within {0:?}")]
    Timeout(Duration),
}

/// Generates text for one prompt.
///
/// `field` names what the prompt is for (a clause category or the summary) so
/// implementations can route, log or fake per field.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(
        &self,
        field: ResultField,
        prompt: &Prompt,
    ) -> Result<String, CompletionError>;
}
