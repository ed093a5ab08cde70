//! Markdown → plain text for full-text indexing.
//!
//! The passes run in a fixed order, since earlier passes expose text to later
//! ones (an inline code span can wrap a link, for instance):
//!
//! 1. fenced code blocks are dropped entirely,
//! 2. inline code spans are unwrapped to their literal text,
//! 3. links are unwrapped to their display text,
//! 4. `#`, `*`, `_` and `~` are stripped,
//! 5. whitespace runs collapse to a single space and the result is trimmed.
//!
//! Unwrapping can leave behind new markup (`[[a](b)](c)` becomes `[a](c)`),
//! so the passes repeat until the text stops changing. That makes
//! [`normalize_markdown`] idempotent. Every pass either shortens the text or
//! leaves it unchanged apart from whitespace, so the loop always terminates.

use regex::Regex;
use std::sync::LazyLock;

static FENCED_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)```.*?```").unwrap());
static INLINE_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]+)`").unwrap());
static LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").unwrap());
static MARKUP_SYMBOLS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[#*_~]").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Flatten markdown to searchable plain text.
pub fn normalize_markdown(markdown: &str) -> String {
    let mut current = normalize_once(markdown);
    loop {
        let next = normalize_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn normalize_once(text: &str) -> String {
    let text = FENCED_CODE.replace_all(text, "");
    let text = INLINE_CODE.replace_all(&text, "$1");
    let text = LINK.replace_all(&text, "$1");
    let text = MARKUP_SYMBOLS.replace_all(&text, "");
    let text = WHITESPACE.replace_all(&text, " ");
    text.trim().to_string()
}
