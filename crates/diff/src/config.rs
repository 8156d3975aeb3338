//! Configuration for the diff engine.
//!
//! ```rust
//! use textdiff::{DiffAlgorithm, DiffConfig};
//!
//! let config = DiffConfig::default();
//! assert_eq!(config.algorithm, DiffAlgorithm::Myers);
//! assert_eq!(config.context_chars, 30);
//! ```
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Characters of context collected on each side of a change.
pub const DEFAULT_CONTEXT_CHARS: usize = 30;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DiffConfigError {
    #[error("context_chars must be >= 1")]
    ZeroContext,
}

/// Edit-script algorithm. All three run at character granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffAlgorithm {
    /// Minimal edit script (Myers' O(ND) algorithm).
    #[default]
    Myers,
    Patience,
    Lcs,
}

impl From<DiffAlgorithm> for similar::Algorithm {
    fn from(value: DiffAlgorithm) -> Self {
        match value {
            DiffAlgorithm::Myers => similar::Algorithm::Myers,
            DiffAlgorithm::Patience => similar::Algorithm::Patience,
            DiffAlgorithm::Lcs => similar::Algorithm::Lcs,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    pub algorithm: DiffAlgorithm,

    /// Soft cap on `context.before` / `context.after`, in Unicode scalar values.
    pub context_chars: usize,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            algorithm: DiffAlgorithm::Myers,
            context_chars: DEFAULT_CONTEXT_CHARS,
        }
    }
}

impl DiffConfig {
    pub fn validate(&self) -> Result<(), DiffConfigError> {
        if self.context_chars == 0 {
            return Err(DiffConfigError::ZeroContext);
        }
        Ok(())
    }
}
