//! YAML configuration file support.
//!
//! One file configures every stage of the comparison pipeline. Every section
//! is optional and falls back to the library defaults.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "office documents"
//!
//! extract:
//!   text_extensions: [".txt", ".md", ".csv", ".json", ".xml", ".html", ".js", ".css"]
//!   strict_utf8: false
//!   commands:
//!     ".pdf":
//!       program: "pdftotext"
//!       args: ["-layout", "{path}", "-"]
//!
//! diff:
//!   algorithm: "myers"
//!   context_chars: 30
//!
//! pipeline:
//!   parallel_extraction: true
//!
//! logging:
//!   level: "info"
//!   json: true
//! ```

use std::fs;
use std::path::Path;

use extract::{ExtractConfig, Extractor};
use serde::{Deserialize, Serialize};
use textdiff::DiffConfig;
use thiserror::Error;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

impl From<extract::ConfigError> for ConfigLoadError {
    fn from(value: extract::ConfigError) -> Self {
        ConfigLoadError::Validation(format!("extract: {value}"))
    }
}

impl From<textdiff::DiffConfigError> for ConfigLoadError {
    fn from(value: textdiff::DiffConfigError) -> Self {
        ConfigLoadError::Validation(format!("diff: {value}"))
    }
}

/// Top-level YAML configuration for the comparison pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CompareConfig {
    /// Configuration format version
    pub version: String,

    /// Optional configuration name/description
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub extract: ExtractConfig,

    #[serde(default)]
    pub diff: DiffConfig,

    #[serde(default)]
    pub pipeline: PipelineYamlConfig,

    #[serde(default)]
    pub logging: LoggingYamlConfig,
}

impl CompareConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: CompareConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize back to YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigLoadError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.extract.validate()?;
        self.diff.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Builds the extractor described by the `extract` section, with one
    /// command backend per configured command.
    pub fn build_extractor(&self) -> Result<Extractor, ConfigLoadError> {
        Ok(Extractor::from_config(self.extract.clone())?)
    }
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            extract: ExtractConfig::default(),
            diff: DiffConfig::default(),
            pipeline: PipelineYamlConfig::default(),
            logging: LoggingYamlConfig::default(),
        }
    }
}

/// Pipeline orchestration settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineYamlConfig {
    /// Extract both documents concurrently. Ignored when the crate is built
    /// without the `parallel` feature.
    #[serde(default = "true_value")]
    pub parallel_extraction: bool,
}

impl Default for PipelineYamlConfig {
    fn default() -> Self {
        Self {
            parallel_extraction: true,
        }
    }
}

/// Settings for [`crate::init_tracing`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingYamlConfig {
    /// `EnvFilter` directive, e.g. `info` or `extract=debug,info`.
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "true_value")]
    pub json: bool,
}

impl LoggingYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.level.trim().is_empty() {
            return Err(ConfigLoadError::Validation(
                "logging: level must not be empty".into(),
            ));
        }
        Ok(())
    }
}

impl Default for LoggingYamlConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: true,
        }
    }
}

fn true_value() -> bool {
    true
}
fn default_log_level() -> String {
    "info".to_string()
}
