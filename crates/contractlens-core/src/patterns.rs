//! Ranked heading and keyword patterns used to locate clause sections.
//!
//! Patterns are data, not code: the defaults ship as `patterns/default.json`
//! and a replacement file can be supplied at runtime. Each category holds a
//! list ordered from most to least specific; the section boundary pattern
//! marks the heading line that ends an excerpt.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::contract::ClauseCategory;
use crate::error::PatternError;

const DEFAULT_PATTERNS: &str = include_str!("../patterns/default.json");

/// Whether a pattern identifies a section heading or a looser keyword hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    Heading,
    Keyword,
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Heading => f.write_str("heading"),
            Self::Keyword => f.write_str("keyword"),
        }
    }
}

/// One entry of a category's ranked list, as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternSpec {
    pub kind: PatternKind,
    pub pattern: String,
}

/// Serialisable pattern configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternConfig {
    pub section_boundary: String,
    #[serde(default)]
    pub categories: BTreeMap<ClauseCategory, Vec<PatternSpec>>,
}

impl PatternConfig {
    pub fn from_json(json: &str) -> Result<Self, PatternError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, PatternError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// A compiled ranked pattern.
#[derive(Debug, Clone)]
pub struct RankedPattern {
    kind: PatternKind,
    regex: Regex,
}

impl RankedPattern {
    pub fn kind(&self) -> PatternKind {
        self.kind
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

/// Compiled pattern set, ready for the section locator.
#[derive(Debug, Clone)]
pub struct PatternSet {
    config: PatternConfig,
    boundary: Regex,
    ranked: BTreeMap<ClauseCategory, Vec<RankedPattern>>,
}

impl PatternSet {
    /// The built-in pattern set.
    pub fn builtin() -> Result<Self, PatternError> {
        Self::compile(PatternConfig::from_json(DEFAULT_PATTERNS)?)
    }

    /// Load a pattern set from a JSON file.
    pub fn load(path: &Path) -> Result<Self, PatternError> {
        let json = std::fs::read_to_string(path).map_err(|source| PatternError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let set = Self::compile(PatternConfig::from_json(&json)?)?;
        debug!(path = %path.display(), "loaded pattern set");
        Ok(set)
    }

    /// Load from `path` when given, otherwise fall back to the built-in set.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self, PatternError> {
        match path {
            Some(p) => Self::load(p),
            None => Self::builtin(),
        }
    }

    /// Compile every regex in `config`, failing on the first invalid one.
    pub fn compile(config: PatternConfig) -> Result<Self, PatternError> {
        let boundary = Regex::new(&config.section_boundary).map_err(PatternError::Boundary)?;

        let mut ranked = BTreeMap::new();
        for (&category, specs) in &config.categories {
            let compiled = specs
                .iter()
                .enumerate()
                .map(|(rank, spec)| {
                    Regex::new(&spec.pattern)
                        .map(|regex| RankedPattern {
                            kind: spec.kind,
                            regex,
                        })
                        .map_err(|source| PatternError::Category {
                            category,
                            rank,
                            source,
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            ranked.insert(category, compiled);
        }

        Ok(Self {
            config,
            boundary,
            ranked,
        })
    }

    /// Patterns for `category`, most specific first. Empty when unconfigured.
    pub fn ranked(&self, category: ClauseCategory) -> &[RankedPattern] {
        self.ranked.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Pattern matching a heading line that starts a new section.
    pub fn boundary(&self) -> &Regex {
        &self.boundary
    }

    /// The configuration this set was compiled from.
    pub fn config(&self) -> &PatternConfig {
        &self.config
    }
}
