//! Input document type and extension handling.

use std::ffi::OsStr;
use std::path::Path;

use bytes::Bytes;

/// A named blob of bytes handed in by the caller.
///
/// The name is only used to infer the format through its extension; it is
/// never opened as a path. Cloning is cheap because the payload is a
/// reference-counted [`Bytes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub name: String,
    pub bytes: Bytes,
}

impl Document {
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Lowercased extension of [`Document::name`], dot included.
    ///
    /// ```rust
    /// use extract::Document;
    ///
    /// assert_eq!(Document::new("Report.PDF", Vec::new()).extension(), ".pdf");
    /// assert_eq!(Document::new("README", Vec::new()).extension(), "");
    /// ```
    pub fn extension(&self) -> String {
        extension_of(&self.name)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Returns the lowercased extension of the final component of `file_name`,
/// including the leading dot, or an empty string when there is none.
///
/// Dotfiles such as `.bashrc` have no extension; a trailing dot yields `"."`.
pub fn extension_of(file_name: &str) -> String {
    match Path::new(file_name).extension().map(OsStr::to_string_lossy) {
        Some(ext) => format!(".{}", ext.to_lowercase()),
        None => String::new(),
    }
}

/// Canonical registry key for an extension given with or without its dot.
pub(crate) fn extension_key(extension: &str) -> String {
    let lowered = extension.trim().to_lowercase();
    if lowered.starts_with('.') {
        lowered
    } else {
        format!(".{lowered}")
    }
}
