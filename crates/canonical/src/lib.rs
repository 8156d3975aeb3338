//! Canonical text layer.
//!
//! Extracted text arrives with whatever line endings and padding the source
//! format produced. This crate canonicalizes it so that two documents differing
//! only in CRLF vs LF, blank lines or trailing spaces compare as equal.
//!
//! ## What we do
//!
//! - CRLF → LF
//! - Blank-line collapsing
//! - Trailing space/tab removal per line
//! - Outer trim
//!
//! ## What we don't do
//!
//! No Unicode normalization, no case folding, no collapsing of spaces inside a
//! line. Every character the diff reports must exist in the extracted text.
//!
//! ## Pure function guarantee
//!
//! No I/O, no clock calls, no locale dependence, never fails. Same input, same
//! output, and running it twice changes nothing.

mod text;
mod whitespace;

pub use crate::text::NormalizedText;
pub use crate::whitespace::normalize;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_after_normalization() {
        let windows = "Title\r\n\r\nFirst line   \r\nSecond line\r\n";
        let unix = "Title\nFirst line\nSecond line";
        assert_eq!(normalize(windows), normalize(unix));
    }

    #[test]
    fn normalized_text_derefs_to_str() {
        let text = normalize("  hello \n");
        assert_eq!(text.len(), 5);
        assert!(text.starts_with("he"));
        assert_eq!(text, "hello");
        assert_eq!(text.to_string(), "hello");
    }

    #[test]
    fn char_len_counts_scalars() {
        let text = normalize("café");
        assert_eq!(text.char_len(), 4);
        assert_eq!(text.len(), 5);
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&normalize(" a\r\nb ")).expect("serialize");
        assert_eq!(json, "\"a\\nb\"");
    }
}
