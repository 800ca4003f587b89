//! LLM integration: the completion service seam and its Groq HTTP client.

mod completion;
pub use completion::{CompletionError, CompletionService};

mod groq;
pub use groq::{ApiKey, CompletionConfig, DEFAULT_API_BASE, DEFAULT_MODEL, GroqClient};
