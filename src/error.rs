use std::fmt;

use extract::ExtractError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ConfigLoadError;

/// Which input of a comparison an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentSlot {
    First,
    Second,
}

impl DocumentSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentSlot::First => "first",
            DocumentSlot::Second => "second",
        }
    }
}

impl fmt::Display for DocumentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while comparing two documents.
#[derive(Debug, Error)]
pub enum ComparisonError {
    /// Extraction of one input failed. When both fail, the first document's
    /// error is the one reported.
    #[error("extraction of {document} document failed: {source}")]
    Extraction {
        document: DocumentSlot,
        #[source]
        source: ExtractError,
    },

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigLoadError),

    /// A blocking extraction task panicked or was cancelled.
    #[error("comparison task failed: {0}")]
    TaskFailed(String),
}

impl ComparisonError {
    pub(crate) fn extraction(document: DocumentSlot, source: ExtractError) -> Self {
        ComparisonError::Extraction { document, source }
    }

    /// The extraction error, if that is what this is.
    pub fn extract_error(&self) -> Option<&ExtractError> {
        match self {
            ComparisonError::Extraction { source, .. } => Some(source),
            _ => None,
        }
    }

    pub fn document(&self) -> Option<DocumentSlot> {
        match self {
            ComparisonError::Extraction { document, .. } => Some(*document),
            _ => None,
        }
    }

    pub fn is_unsupported_format(&self) -> bool {
        self.extract_error()
            .is_some_and(ExtractError::is_unsupported_format)
    }
}
