//! Section location: narrow a whole contract down to the excerpt most likely
//! to hold a given clause.
//!
//! # Algorithm
//!
//! 1. Try the category's patterns in rank order. The first rank with any match
//!    wins; lower ranks are never consulted once a higher one matches. Within
//!    a rank the earliest match wins.
//! 2. The excerpt starts at the match and runs to the character budget or to
//!    the next section heading after the matched line, whichever is shorter.
//! 3. With no match at all, the excerpt is the text cut at the budget and the
//!    match is flagged [`MatchConfidence::Fallback`]. The completion call is
//!    still attempted on it.

use std::fmt;

use crate::contract::ClauseCategory;
use crate::normalize::truncate_chars;
use crate::patterns::{PatternKind, PatternSet};

/// Default excerpt budget, in characters.
pub const DEFAULT_EXCERPT_CHARS: usize = 2000;

/// How an excerpt was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchConfidence {
    Heading,
    Keyword,
    Fallback,
}

impl From<PatternKind> for MatchConfidence {
    fn from(kind: PatternKind) -> Self {
        match kind {
            PatternKind::Heading => Self::Heading,
            PatternKind::Keyword => Self::Keyword,
        }
    }
}

impl fmt::Display for MatchConfidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Heading => f.write_str("heading"),
            Self::Keyword => f.write_str("keyword"),
            Self::Fallback => f.write_str("fallback"),
        }
    }
}

/// The located excerpt for one category of one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionMatch {
    pub category: ClauseCategory,
    pub excerpt: String,
    pub confidence: MatchConfidence,
    /// Byte offset of the match in the normalised text.
    pub offset: Option<usize>,
    /// Index of the winning pattern in the category's ranking.
    pub rank: Option<usize>,
}

impl SectionMatch {
    pub fn is_fallback(&self) -> bool {
        self.confidence == MatchConfidence::Fallback
    }
}

/// Stateless locator over a compiled [`PatternSet`].
#[derive(Debug, Clone)]
pub struct SectionLocator {
    patterns: PatternSet,
    budget: usize,
}

impl SectionLocator {
    pub fn new(patterns: PatternSet, budget: usize) -> Self {
        Self { patterns, budget }
    }

    /// Locate the excerpt for `category` in normalised `text`.
    pub fn locate(&self, text: &str, category: ClauseCategory) -> SectionMatch {
        for (rank, pattern) in self.patterns.ranked(category).iter().enumerate() {
            if let Some(m) = pattern.regex().find(text) {
                return SectionMatch {
                    category,
                    excerpt: self.bounded_excerpt(text, m.start()).to_string(),
                    confidence: pattern.kind().into(),
                    offset: Some(m.start()),
                    rank: Some(rank),
                };
            }
        }

        SectionMatch {
            category,
            excerpt: truncate_chars(text, self.budget).to_string(),
            confidence: MatchConfidence::Fallback,
            offset: None,
            rank: None,
        }
    }

    /// Slice from `start` up to the budget or the next heading line.
    fn bounded_excerpt<'a>(&self, text: &'a str, start: usize) -> &'a str {
        let window = truncate_chars(&text[start..], self.budget);

        // The heading that produced the match must not end its own excerpt.
        let Some(first_newline) = window.find('\n') else {
            return window;
        };
        match self.patterns.boundary().find_at(window, first_newline + 1) {
            Some(next) => window[..next.start()].trim_end(),
            None => window,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::PatternConfig;

    fn builtin(budget: usize) -> SectionLocator {
        SectionLocator::new(PatternSet::builtin().unwrap(), budget)
    }

    const CONTRACT: &str = "MASTER SERVICES AGREEMENT\n\
        This Agreement sets out the terms on which early termination fees apply.\n\
        1. Services\n\
        The Supplier shall provide the Services.\n\
        2. Confidentiality\n\
        Each party shall keep the other party's Confidential Information secret.\n\
        3. Termination\n\
        Either party may terminate this Agreement on 30 days written notice.\n\
        3.1 Termination does not affect accrued rights.\n\
        4. Limitation of Liability\n\
        Neither party shall be liable for indirect loss.\n\
        5. Governing Law\n\
        This Agreement is governed by the laws of England.";

    #[test]
    fn heading_match_outranks_earlier_keyword() {
        let m = builtin(DEFAULT_EXCERPT_CHARS).locate(CONTRACT, ClauseCategory::Termination);
        assert_eq!(m.confidence, MatchConfidence::Heading);
        assert_eq!(m.rank, Some(0));
        assert!(m.excerpt.starts_with("3. Termination"), "{:?}", m.excerpt);
        // The preamble mentions termination first, but only as a keyword.
        assert!(m.offset.unwrap() > CONTRACT.find("termination fees").unwrap());
    }

    #[test]
    fn excerpt_stops_at_next_section() {
        let m = builtin(DEFAULT_EXCERPT_CHARS).locate(CONTRACT, ClauseCategory::Termination);
        assert_eq!(
            m.excerpt,
            "3. Termination\n\
             Either party may terminate this Agreement on 30 days written notice.\n\
             3.1 Termination does not affect accrued rights."
        );
    }

    #[test]
    fn all_caps_clause_body_stays_in_excerpt() {
        let text = "9. Warranties\n\
                    The Supplier warrants the Services.\n\
                    10. LIMITATION OF LIABILITY\n\
                    IN NO EVENT SHALL EITHER PARTY BE LIABLE TO THE OTHER\n\
                    FOR ANY INDIRECT, SPECIAL OR CONSEQUENTIAL DAMAGES\n\
                    ARISING OUT OF THIS AGREEMENT.\n\
                    11. Governing Law\n\
                    This Agreement is governed by the laws of England.";
        let m = builtin(DEFAULT_EXCERPT_CHARS).locate(text, ClauseCategory::Liability);
        assert_eq!(m.confidence, MatchConfidence::Heading);
        assert!(m.excerpt.starts_with("10. LIMITATION OF LIABILITY\nIN NO EVENT"));
        assert!(m.excerpt.contains("CONSEQUENTIAL DAMAGES"));
        assert!(m.excerpt.ends_with("ARISING OUT OF THIS AGREEMENT."));
        assert!(!m.excerpt.contains("Governing Law"));
    }

    #[test]
    fn run_in_heading_outranks_defined_term() {
        let text = "1. Definitions\n\
                    \"Termination Date\" means the date on which notice expires.\n\
                    8. Termination. Either party may terminate this Agreement on thirty days written notice to the other party.\n\
                    Accrued rights survive.\n\
                    9. Governing Law. This Agreement is governed by the laws of England.";
        let m = builtin(DEFAULT_EXCERPT_CHARS).locate(text, ClauseCategory::Termination);
        assert_eq!(m.confidence, MatchConfidence::Heading);
        assert_eq!(m.rank, Some(1));
        assert_eq!(
            m.excerpt,
            "8. Termination. Either party may terminate this Agreement on thirty days written notice to the other party.\n\
             Accrued rights survive."
        );
    }

    #[test]
    fn excerpt_respects_budget() {
        let m = builtin(20).locate(CONTRACT, ClauseCategory::Liability);
        assert_eq!(m.excerpt, "4. Limitation of Lia");
        assert_eq!(m.excerpt.chars().count(), 20);
    }

    #[test]
    fn excerpt_budget_is_a_hard_cap() {
        let m = builtin(10).locate(CONTRACT, ClauseCategory::Confidentiality);
        assert!(m.excerpt.chars().count() <= 10);
        assert_eq!(m.excerpt, "2. Confide");
    }

    #[test]
    fn keyword_match_when_no_heading() {
        let text = "The parties agree that all pricing is confidential and \
                    shall not be shared.\nPayment is due in 30 days.";
        let m = builtin(DEFAULT_EXCERPT_CHARS).locate(text, ClauseCategory::Confidentiality);
        assert_eq!(m.confidence, MatchConfidence::Keyword);
        assert_eq!(m.rank, Some(3));
        assert!(m.excerpt.starts_with("confidential and shall not be shared."));
        assert!(!m.is_fallback());
    }

    #[test]
    fn fallback_truncates_whole_text() {
        let text = "This lease covers the premises at 1 High Street. Rent is payable monthly.";
        let m = builtin(16).locate(text, ClauseCategory::Liability);
        assert!(m.is_fallback());
        assert_eq!(m.excerpt, "This lease cover");
        assert_eq!(m.offset, None);
        assert_eq!(m.rank, None);
    }

    #[test]
    fn fallback_returns_short_text_whole() {
        let text = "Rent is payable monthly.";
        let m = builtin(DEFAULT_EXCERPT_CHARS).locate(text, ClauseCategory::Termination);
        assert!(m.is_fallback());
        assert_eq!(m.excerpt, text);
    }

    #[test]
    fn empty_text_is_an_empty_fallback() {
        for category in ClauseCategory::ALL {
            let m = builtin(DEFAULT_EXCERPT_CHARS).locate("", category);
            assert!(m.is_fallback());
            assert!(m.excerpt.is_empty());
        }
    }

    #[test]
    fn categories_may_overlap() {
        let text = "7. Confidentiality and Liability\n\
                    Breach of confidentiality creates unlimited liability.";
        let locator = builtin(DEFAULT_EXCERPT_CHARS);
        let conf = locator.locate(text, ClauseCategory::Confidentiality);
        let liab = locator.locate(text, ClauseCategory::Liability);
        assert_eq!(conf.excerpt, text);
        assert!(liab.excerpt.contains("unlimited liability"));
    }

    #[test]
    fn unconfigured_category_falls_back() {
        let config = PatternConfig::from_json(
            r#"{"section_boundary": "(?m)^\\d+\\. ", "categories": {}}"#,
        )
        .unwrap();
        let locator = SectionLocator::new(PatternSet::compile(config).unwrap(), 5);
        let m = locator.locate("12. Termination", ClauseCategory::Termination);
        assert!(m.is_fallback());
        assert_eq!(m.excerpt, "12. T");
    }

    #[test]
    fn match_on_last_line_runs_to_end() {
        let m = builtin(DEFAULT_EXCERPT_CHARS)
            .locate("Preamble.\nThe Supplier is liable for defects", ClauseCategory::Liability);
        assert_eq!(m.excerpt, "liable for defects");
    }
}
