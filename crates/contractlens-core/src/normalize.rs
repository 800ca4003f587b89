//! Text normalisation for extracted contract pages.
//!
//! PDF text extraction produces inconsistent whitespace, carriage returns,
//! form feeds and running footers. Section headings are detected line by line,
//! so normalisation collapses horizontal whitespace but keeps line structure.
//!
//! # Rules
//!
//! 1. Missing or blank pages are skipped; the rest are joined with a blank line
//! 2. `\r\n`, `\r` and form feeds become `\n`
//! 3. `Page N of M` footers are removed (repeatedly, until none remain)
//! 4. Horizontal whitespace runs become one space; spaces next to a newline go
//! 5. Three or more newlines become a blank line
//! 6. Leading and trailing whitespace is trimmed
//!
//! Normalising already-normalised text returns it unchanged.

use std::sync::LazyLock;

use regex::Regex;

static PAGE_FOOTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bpage\s+\d+\s+of\s+\d+\b").expect("footer regex"));

static HORIZONTAL_WS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\S\n]+").expect("whitespace regex"));

static LINE_EDGE_SPACES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" *\n *").expect("line edge regex"));

static EXCESS_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("newline regex"));

/// Join extracted pages in order and normalise the result.
///
/// `None` marks a page the extractor could not read. A document with no
/// readable pages normalises to the empty string.
pub fn normalize_pages<S: AsRef<str>>(pages: &[Option<S>]) -> String {
    let readable: Vec<&str> = pages
        .iter()
        .filter_map(|p| p.as_ref().map(AsRef::as_ref))
        .filter(|p| !p.trim().is_empty())
        .collect();
    normalize_text(&readable.join("\n\n"))
}

/// Normalise a single block of extracted text.
pub fn normalize_text(raw: &str) -> String {
    let mut text = raw.replace("\r\n", "\n").replace(['\r', '\x0c'], "\n");

    // Removing a footer can splice together the pieces of another one.
    while PAGE_FOOTER.is_match(&text) {
        text = PAGE_FOOTER.replace_all(&text, "").into_owned();
    }

    let text = HORIZONTAL_WS.replace_all(&text, " ");
    let text = LINE_EDGE_SPACES.replace_all(&text, "\n");
    let text = EXCESS_NEWLINES.replace_all(&text, "\n\n");
    text.trim().to_string()
}

/// Cut `text` to at most `max_chars` characters, on a character boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
