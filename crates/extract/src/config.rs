//! Configuration for the extraction layer.
//!
//! [`ExtractConfig`] decides which extensions are decoded in-process, how
//! strictly, where scoped temporary files go, and which external commands
//! serve the remaining formats. It is cheap to clone and deserializes from
//! the `extract:` section of the YAML file.
//!
//! ```rust
//! use extract::ExtractConfig;
//!
//! let config = ExtractConfig::default();
//! assert!(config.is_text_native(".md"));
//! assert!(!config.is_text_native(".pdf"));
//! config.validate().expect("defaults are valid");
//! ```
use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backend::CommandSpec;
use crate::types::extension_key;

/// Extensions decoded directly as UTF-8 without any backend.
pub const DEFAULT_TEXT_EXTENSIONS: &[&str] = &[
    ".txt", ".md", ".csv", ".json", ".xml", ".html", ".js", ".css",
];

/// Errors raised while validating an [`ExtractConfig`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid extension `{0}`: must start with '.' and contain no path separators")]
    InvalidExtension(String),
    #[error("command for `{0}` has an empty program")]
    EmptyProgram(String),
    #[error("temp_dir `{0}` is not a directory")]
    InvalidTempDir(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Extensions (lowercase, dot included) decoded in-process as UTF-8.
    pub text_extensions: Vec<String>,

    /// Reject invalid UTF-8 in text-native files instead of replacing it
    /// with U+FFFD.
    pub strict_utf8: bool,

    /// Directory for scoped temporary files. Defaults to the OS temp dir.
    pub temp_dir: Option<PathBuf>,

    /// External converters keyed by extension.
    pub commands: BTreeMap<String, CommandSpec>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            text_extensions: DEFAULT_TEXT_EXTENSIONS
                .iter()
                .map(|ext| (*ext).to_string())
                .collect(),
            strict_utf8: false,
            temp_dir: None,
            commands: BTreeMap::new(),
        }
    }
}

impl ExtractConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for ext in self.text_extensions.iter().chain(self.commands.keys()) {
            validate_extension(ext)?;
        }
        for (ext, spec) in &self.commands {
            if spec.program.trim().is_empty() {
                return Err(ConfigError::EmptyProgram(ext.clone()));
            }
        }
        if let Some(dir) = &self.temp_dir {
            if !dir.is_dir() {
                return Err(ConfigError::InvalidTempDir(dir.display().to_string()));
            }
        }
        Ok(())
    }

    pub fn is_text_native(&self, extension: &str) -> bool {
        let key = extension_key(extension);
        self.text_extensions
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(&key))
    }
}

fn validate_extension(ext: &str) -> Result<(), ConfigError> {
    let ok = ext.len() > 1 && ext.starts_with('.') && !ext.contains(['/', '\\']);
    if ok {
        Ok(())
    } else {
        Err(ConfigError::InvalidExtension(ext.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_text_formats() {
        let cfg = ExtractConfig::default();
        for ext in DEFAULT_TEXT_EXTENSIONS {
            assert!(cfg.is_text_native(ext));
        }
        assert!(cfg.is_text_native("TXT"));
        assert!(!cfg.is_text_native(".docx"));
        assert!(!cfg.is_text_native(""));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn extension_without_dot_rejected() {
        let cfg = ExtractConfig {
            text_extensions: vec!["txt".into()],
            ..Default::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::InvalidExtension("txt".into()))
        );
    }

    #[test]
    fn empty_program_rejected() {
        let mut cfg = ExtractConfig::default();
        cfg.commands.insert(
            ".pdf".into(),
            CommandSpec {
                program: "  ".into(),
                args: vec![],
            },
        );
        assert_eq!(cfg.validate(), Err(ConfigError::EmptyProgram(".pdf".into())));
    }

    #[test]
    fn missing_temp_dir_rejected() {
        let cfg = ExtractConfig {
            temp_dir: Some(PathBuf::from("/definitely/not/here/doccompare")),
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidTempDir(_))));
    }

    #[test]
    fn partial_json_uses_defaults() {
        let cfg: ExtractConfig =
            serde_json::from_str(r#"{"strict_utf8": true}"#).expect("deserialize");
        assert!(cfg.strict_utf8);
        assert_eq!(cfg.text_extensions.len(), DEFAULT_TEXT_EXTENSIONS.len());
    }
}
