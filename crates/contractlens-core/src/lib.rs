//! Core types and text heuristics for contractlens: normalisation, ranked
//! section location and prompt building.

pub mod contract;
pub mod error;
pub mod locator;
pub mod normalize;
pub mod patterns;
pub mod prompt;
pub mod schema;
pub mod source;

pub use contract::{
    ClauseCategory, ContractDocument, ContractResult, EXTRACTION_FAILED, NOT_FOUND, ResultField,
    contract_id,
};
pub use error::{DocumentError, PatternError};
pub use locator::{DEFAULT_EXCERPT_CHARS, MatchConfidence, SectionLocator, SectionMatch};
pub use normalize::{normalize_pages, normalize_text, truncate_chars};
pub use patterns::{PatternConfig, PatternKind, PatternSet, PatternSpec};
pub use prompt::{DEFAULT_SUMMARY_CHARS, Prompt, PromptBuilder};
pub use schema::output;
pub use source::PageSource;
