//! Error types produced by the extract crate.
//!
//! Extraction fails for one of two reasons: nobody knows how to read the
//! declared format ([`UnsupportedFormat`](ExtractError::UnsupportedFormat)),
//! or somebody tried and could not ([`Backend`](ExtractError::Backend),
//! [`InvalidUtf8`](ExtractError::InvalidUtf8), [`TempFile`](ExtractError::TempFile)).
//!
//! | Error | Category | Description |
//! |-------|----------|-------------|
//! | [`UnsupportedFormat`](ExtractError::UnsupportedFormat) | Format | No text-native shortcut and no backend for the extension |
//! | [`Backend`](ExtractError::Backend) | Extraction | Backend ran and reported a failure |
//! | [`InvalidUtf8`](ExtractError::InvalidUtf8) | Extraction | Strict decoding of a text-native file failed |
//! | [`TempFile`](ExtractError::TempFile) | Extraction | The scoped temporary file could not be materialized |
//!
//! ```rust
//! use extract::ExtractError;
//!
//! fn to_http_status(error: &ExtractError) -> u16 {
//!     if error.is_unsupported_format() { 415 } else { 422 }
//! }
//!
//! let err = ExtractError::UnsupportedFormat {
//!     file_name: "scan.tiff".into(),
//!     extension: ".tiff".into(),
//! };
//! assert_eq!(to_http_status(&err), 415);
//! ```
use thiserror::Error;

/// Errors that can occur while turning a document into plain text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExtractError {
    /// The extension has neither a text-native shortcut nor a registered backend.
    #[error("unsupported format `{extension}` for file `{file_name}`")]
    UnsupportedFormat {
        file_name: String,
        extension: String,
    },

    /// The backend was invoked and failed. `message` is the backend's own diagnostic.
    #[error("extraction failed for `{file_name}`: {message}")]
    Backend { file_name: String, message: String },

    /// A text-native file was not valid UTF-8 and strict decoding is enabled.
    #[error("invalid utf-8 in `{file_name}`: {message}")]
    InvalidUtf8 { file_name: String, message: String },

    /// Creating or writing the scoped temporary file failed.
    #[error("could not stage temporary file: {0}")]
    TempFile(String),
}

impl ExtractError {
    /// True when the failure is about the declared format rather than the content.
    pub fn is_unsupported_format(&self) -> bool {
        matches!(self, ExtractError::UnsupportedFormat { .. })
    }

    /// Name of the document the error refers to, when known.
    pub fn file_name(&self) -> Option<&str> {
        match self {
            ExtractError::UnsupportedFormat { file_name, .. }
            | ExtractError::Backend { file_name, .. }
            | ExtractError::InvalidUtf8 { file_name, .. } => Some(file_name),
            ExtractError::TempFile(_) => None,
        }
    }
}
