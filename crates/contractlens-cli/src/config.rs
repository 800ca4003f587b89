//! Command-line configuration for `extract`, validated before any document is touched.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Args;
use contractlens_ai::{ApiKey, CompletionConfig, DEFAULT_API_BASE, DEFAULT_MODEL};
use contractlens_core::{DEFAULT_EXCERPT_CHARS, DEFAULT_SUMMARY_CHARS, PatternError, PatternSet};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing completion API key: set GROQ_API_KEY in the environment or a .env file")]
    MissingCredential,

    #[error("input directory not found: {0}")]
    InputMissing(PathBuf),

    #[error("input path is not a directory: {0}")]
    InputNotDirectory(PathBuf),

    #[error("cannot list {path}: {source}")]
    InputUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("no PDF files found in {0}")]
    NoDocuments(PathBuf),

    #[error("output directory does not exist for {0}")]
    OutputDirMissing(PathBuf),

    #[error("output path is a directory: {0}")]
    OutputIsDirectory(PathBuf),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error(transparent)]
    Patterns(#[from] PatternError),
}

#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// Directory of contract PDFs (one contract per file).
    #[arg(long, alias = "input_dir", env = "CONTRACTLENS_INPUT_DIR")]
    pub input_dir: PathBuf,

    /// Path of the JSON output file.
    #[arg(long, alias = "out_json", env = "CONTRACTLENS_OUT_JSON")]
    pub out_json: PathBuf,

    /// Path of the CSV output file.
    #[arg(long, alias = "out_csv", env = "CONTRACTLENS_OUT_CSV")]
    pub out_csv: PathBuf,

    /// Completion service API key.
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// JSON file replacing the built-in ranked section patterns.
    #[arg(long, env = "CONTRACTLENS_PATTERNS")]
    pub patterns: Option<PathBuf>,

    /// Completion model name.
    #[arg(long, env = "CONTRACTLENS_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Base URL of the OpenAI-compatible completion API.
    #[arg(long, env = "CONTRACTLENS_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Per-call completion timeout, in seconds.
    #[arg(long, env = "CONTRACTLENS_TIMEOUT_SECS", default_value_t = 60)]
    pub timeout_secs: u64,

    /// Maximum clause excerpt length, in characters.
    #[arg(long, env = "CONTRACTLENS_EXCERPT_CHARS", default_value_t = DEFAULT_EXCERPT_CHARS)]
    pub excerpt_chars: usize,

    /// Maximum contract text sent for the summary, in characters.
    #[arg(long, env = "CONTRACTLENS_SUMMARY_CHARS", default_value_t = DEFAULT_SUMMARY_CHARS)]
    pub summary_chars: usize,
}

/// Validated configuration for one extraction run.
#[derive(Debug)]
pub struct ExtractConfig {
    pub input_dir: PathBuf,
    pub documents: Vec<PathBuf>,
    pub out_json: PathBuf,
    pub out_csv: PathBuf,
    pub completion: CompletionConfig,
    pub patterns: PatternSet,
    pub excerpt_chars: usize,
    pub summary_chars: usize,
    pub call_timeout: Duration,
}

impl ExtractArgs {
    /// Validate arguments in order: credential, budgets, outputs, patterns, inputs.
    pub fn into_config(self) -> Result<ExtractConfig, ConfigError> {
        let api_key = self
            .api_key
            .and_then(ApiKey::new)
            .ok_or(ConfigError::MissingCredential)?;

        if self.timeout_secs == 0 {
            return Err(ConfigError::Zero("timeout-secs"));
        }
        if self.excerpt_chars == 0 {
            return Err(ConfigError::Zero("excerpt-chars"));
        }
        if self.summary_chars == 0 {
            return Err(ConfigError::Zero("summary-chars"));
        }

        check_output_path(&self.out_json)?;
        check_output_path(&self.out_csv)?;

        let patterns = PatternSet::load_or_builtin(self.patterns.as_deref())?;
        let documents = discover_pdfs(&self.input_dir)?;

        let call_timeout = Duration::from_secs(self.timeout_secs);
        let completion = CompletionConfig {
            api_key,
            base_url: self.api_base,
            model: self.model,
            temperature: 0.0,
            timeout: call_timeout,
        };

        Ok(ExtractConfig {
            input_dir: self.input_dir,
            documents,
            out_json: self.out_json,
            out_csv: self.out_csv,
            completion,
            patterns,
            excerpt_chars: self.excerpt_chars,
            summary_chars: self.summary_chars,
            call_timeout,
        })
    }
}

/// An output path is usable when its directory exists and it is not itself a directory.
fn check_output_path(path: &Path) -> Result<(), ConfigError> {
    if path.is_dir() {
        return Err(ConfigError::OutputIsDirectory(path.to_path_buf()));
    }
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() && !dir.is_dir() => {
            Err(ConfigError::OutputDirMissing(path.to_path_buf()))
        }
        _ => Ok(()),
    }
}

/// List `*.pdf` files (extension matched case-insensitively) in sorted order.
pub fn discover_pdfs(dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    if !dir.exists() {
        return Err(ConfigError::InputMissing(dir.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(ConfigError::InputNotDirectory(dir.to_path_buf()));
    }

    let unreadable = |source: std::io::Error| ConfigError::InputUnreadable {
        path: dir.to_path_buf(),
        source,
    };
    let mut pdfs = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(unreadable)? {
        let path = entry.map_err(unreadable)?.path();
        let is_pdf = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf && path.is_file() {
            pdfs.push(path);
        }
    }

    if pdfs.is_empty() {
        return Err(ConfigError::NoDocuments(dir.to_path_buf()));
    }
    pdfs.sort();
    Ok(pdfs)
}
