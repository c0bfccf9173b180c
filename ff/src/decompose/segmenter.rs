//! Journal text segmentation

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

/// Statements at or below this many characters are dropped
pub const MIN_STATEMENT_CHARS: usize = 10;

static BOUNDARY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?\n]+").expect("static regex"));

/// Split journal text into candidate statements
///
/// Splits on sentence punctuation and newlines, trims each piece and keeps
/// only pieces longer than `MIN_STATEMENT_CHARS` characters, in source order.
pub fn segment(text: &str) -> Vec<String> {
    debug!(text_len = text.len(), "segment: called");
    let statements: Vec<String> = BOUNDARY
        .split(text)
        .map(str::trim)
        .filter(|piece| piece.chars().count() > MIN_STATEMENT_CHARS)
        .map(str::to_string)
        .collect();
    debug!(count = statements.len(), "segment: done");
    statements
}
