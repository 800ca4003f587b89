//! Prompt templates for clause extraction and contract summaries.

use crate::contract::ClauseCategory;
use crate::locator::DEFAULT_EXCERPT_CHARS;
use crate::normalize::truncate_chars;

/// Default summary budget, in characters of normalised contract text.
pub const DEFAULT_SUMMARY_CHARS: usize = 5000;

const CLAUSE_MAX_TOKENS: u32 = 800;
const SUMMARY_MAX_TOKENS: u32 = 400;

// ── Prompt templates ──

const CLAUSE_SYSTEM_PROMPT: &str = "\
You are a legal contract clause extractor. \
Return ONLY the exact clause text, verbatim, as it appears in the contract. \
If the clause is not present, return an empty string. Do not paraphrase.";

const SUMMARY_SYSTEM_PROMPT: &str = "\
You are an expert legal summarizer. \
Write a 100-150 word summary including: purpose, obligations, risks.";

fn clause_user_prompt(category: ClauseCategory, excerpt: &str) -> String {
    format!(
        "Extract the {category} clause verbatim from the text below.\n\
         Return ONLY the original clause text. No explanation.\n\
         \n\
         Text:\n\
         \"\"\"{excerpt}\"\"\"",
    )
}

fn summary_user_prompt(text: &str) -> String {
    format!(
        "Write a clear 100-150 word summary including purpose, both parties' \
         obligations, and risks.\n\
         \n\
         Contract:\n\
         \"\"\"{text}\"\"\"",
    )
}

/// A ready-to-send completion request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
}

/// Builds bounded prompts: inputs longer than their budget are cut, never dropped.
#[derive(Debug, Clone, Copy)]
pub struct PromptBuilder {
    excerpt_chars: usize,
    summary_chars: usize,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_EXCERPT_CHARS, DEFAULT_SUMMARY_CHARS)
    }
}

impl PromptBuilder {
    pub fn new(excerpt_chars: usize, summary_chars: usize) -> Self {
        Self {
            excerpt_chars,
            summary_chars,
        }
    }

    /// Prompt asking for the verbatim `category` clause found in `excerpt`.
    pub fn clause(&self, category: ClauseCategory, excerpt: &str) -> Prompt {
        let excerpt = truncate_chars(excerpt, self.excerpt_chars);
        Prompt {
            system: CLAUSE_SYSTEM_PROMPT.to_string(),
            user: clause_user_prompt(category, excerpt),
            max_tokens: CLAUSE_MAX_TOKENS,
        }
    }

    /// Prompt asking for a short summary of the whole normalised contract.
    pub fn summary(&self, text: &str) -> Prompt {
        let text = truncate_chars(text, self.summary_chars);
        Prompt {
            system: SUMMARY_SYSTEM_PROMPT.to_string(),
            user: summary_user_prompt(text),
            max_tokens: SUMMARY_MAX_TOKENS,
        }
    }
}
