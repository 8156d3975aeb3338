//! Whitespace and line-ending normalization.
//!
//! # Rules
//!
//! Applied in this order:
//!
//! 1. CRLF line endings become LF.
//! 2. Runs of LF collapse into a single LF, so blank lines disappear.
//! 3. Horizontal whitespace (space, tab) at the end of a line is removed.
//! 4. The whole string is trimmed.
//!
//! A line made only of spaces or tabs counts as blank once rule 3 has run,
//! so it is collapsed too. That keeps the function idempotent:
//! `normalize(normalize(x)) == normalize(x)`.
//!
//! # Algorithm
//!
//! One pass over the LF-separated lines. Each line loses its trailing
//! space/tab/CR characters (a CR at a line end is what is left of a CRLF),
//! empty lines are skipped, and the survivors are joined with LF before the
//! final trim. Characters inside a line are never touched.
//!
//! ```rust
//! use canonical::normalize;
//!
//! assert_eq!(normalize("a\r\n\r\nb").as_str(), "a\nb");
//! assert_eq!(normalize("  title  \n\n\tbody\t\n").as_str(), "title\n\tbody");
//! ```

use crate::text::NormalizedText;

const LINE_BREAK: char = '\n';

/// Characters stripped from the end of every line.
const TRAILING_HORIZONTAL: [char; 3] = [' ', '\t', '\r'];

/// Normalizes line endings and whitespace. Total: every input has an output.
pub fn normalize(text: &str) -> NormalizedText {
    let mut normalized = String::with_capacity(text.len());
    for line in text.split(LINE_BREAK) {
        let line = line.trim_end_matches(TRAILING_HORIZONTAL);
        if line.is_empty() {
            continue;
        }
        if !normalized.is_empty() {
            normalized.push(LINE_BREAK);
        }
        normalized.push_str(line);
    }

    let trimmed = normalized.trim();
    if trimmed.len() != normalized.len() {
        normalized = trimmed.to_owned();
    }
    NormalizedText::new_unchecked(normalized)
}
