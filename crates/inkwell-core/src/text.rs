//! Plain-text extraction from entry markup
//!
//! Content is stored as an opaque HTML-like string. These helpers derive the
//! text used for searching, word counts and previews; they are never used to
//! rewrite stored content.

use once_cell::sync::Lazy;
use regex::Regex;

static BLOCK_TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)</?(p|div|h[1-6]|li|br|ul|ol|blockquote)[^>]*>")
        .expect("valid block tag regex")
});
static ANY_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));
static EMPTY_OR_ANY_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Strip markup down to single-spaced plain text.
///
/// Block-level tags become a space so adjacent paragraphs do not fuse into
/// one word; all other tags are dropped.
pub fn strip_markup(content: &str) -> String {
    if content.is_empty() {
        return String::new();
    }
    let spaced = BLOCK_TAG_RE.replace_all(content, " ");
    let bare = ANY_TAG_RE.replace_all(&spaced, "");
    WHITESPACE_RE.replace_all(&bare, " ").trim().to_string()
}

/// Count whitespace-delimited words in the stripped text
pub fn word_count(content: &str) -> usize {
    strip_markup(content).split_whitespace().count()
}

/// Count characters with tags removed, whitespace kept as-is
pub fn char_count(content: &str) -> usize {
    EMPTY_OR_ANY_TAG_RE.replace_all(content, "").chars().count()
}

/// Plain-text preview of at most `max_chars` characters, ending in "..."
/// when truncated
pub fn preview(content: &str, max_chars: usize) -> String {
    let plain = strip_markup(content);
    if plain.chars().count() <= max_chars {
        return plain;
    }
    let keep = max_chars.saturating_sub(3);
    let cut: String = plain.chars().take(keep).collect();
    format!("{}...", cut.trim_end())
}
