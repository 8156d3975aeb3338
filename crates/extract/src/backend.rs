//! Format backends and the registry that maps extensions onto them.
//!
//! A backend is an opaque capability: it receives the path of a scoped
//! temporary file plus [`ExtractOptions`] and returns text or a
//! [`BackendError`]. The [`Extractor`](crate::Extractor) owns a
//! [`BackendRegistry`]; nothing is looked up through global state.
//!
//! ```rust
//! use std::path::Path;
//! use std::sync::Arc;
//! use extract::{BackendError, BackendRegistry, ExtractOptions, ExtractionBackend};
//!
//! #[derive(Debug)]
//! struct Upper;
//!
//! impl ExtractionBackend for Upper {
//!     fn name(&self) -> &str { "upper" }
//!     fn extract_from_path(&self, path: &Path, _: &ExtractOptions) -> Result<String, BackendError> {
//!         std::fs::read_to_string(path)
//!             .map(|s| s.to_uppercase())
//!             .map_err(|e| BackendError::new(e.to_string()))
//!     }
//! }
//!
//! let registry = BackendRegistry::new().with_backend("rtf", Arc::new(Upper));
//! assert!(registry.get(".rtf").is_some());
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::process::Command;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::extension_key;

/// Placeholder replaced by the temporary file path in [`CommandSpec::args`].
pub const PATH_PLACEHOLDER: &str = "{path}";

/// Options forwarded to every backend call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractOptions {
    /// Keep the document's line structure instead of flattening it to one line.
    pub preserve_line_breaks: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            preserve_line_breaks: true,
        }
    }
}

/// Failure reported by a backend. Carries the backend's own diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct BackendError {
    message: String,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Capability that turns a file on disk into plain text.
pub trait ExtractionBackend: Send + Sync + fmt::Debug {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Extract text from the file at `path`. An empty result is valid.
    fn extract_from_path(
        &self,
        path: &Path,
        options: &ExtractOptions,
    ) -> Result<String, BackendError>;
}

/// Explicit extension → backend mapping.
///
/// Keys are normalized to lowercase with a leading dot, so `"PDF"`, `"pdf"`
/// and `".pdf"` all address the same entry.
#[derive(Debug, Clone, Default)]
pub struct BackendRegistry {
    backends: BTreeMap<String, Arc<dyn ExtractionBackend>>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`BackendRegistry::register`].
    pub fn with_backend(mut self, extension: &str, backend: Arc<dyn ExtractionBackend>) -> Self {
        self.register(extension, backend);
        self
    }

    /// Registers `backend` for `extension`, returning the backend it replaced.
    pub fn register(
        &mut self,
        extension: &str,
        backend: Arc<dyn ExtractionBackend>,
    ) -> Option<Arc<dyn ExtractionBackend>> {
        self.backends.insert(extension_key(extension), backend)
    }

    pub fn get(&self, extension: &str) -> Option<&Arc<dyn ExtractionBackend>> {
        self.backends.get(&extension_key(extension))
    }

    pub fn contains(&self, extension: &str) -> bool {
        self.get(extension).is_some()
    }

    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.backends.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}

/// External program invocation, as written in configuration.
///
/// ```yaml
/// program: pdftotext
/// args: ["-layout", "{path}", "-"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// Backend that shells out to a converter and reads its stdout.
///
/// Every `{path}` in the argument list is replaced with the temporary file
/// path; when no argument mentions `{path}` the path is appended last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandBackend {
    spec: CommandSpec,
}

impl CommandBackend {
    pub fn new(spec: CommandSpec) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> &CommandSpec {
        &self.spec
    }

    fn build_args(&self, path: &Path) -> Vec<String> {
        let path = path.to_string_lossy();
        let mut substituted = false;
        let mut args: Vec<String> = self
            .spec
            .args
            .iter()
            .map(|arg| {
                if arg.contains(PATH_PLACEHOLDER) {
                    substituted = true;
                    arg.replace(PATH_PLACEHOLDER, &path)
                } else {
                    arg.clone()
                }
            })
            .collect();
        if !substituted {
            args.push(path.into_owned());
        }
        args
    }
}

impl ExtractionBackend for CommandBackend {
    fn name(&self) -> &str {
        &self.spec.program
    }

    fn extract_from_path(
        &self,
        path: &Path,
        options: &ExtractOptions,
    ) -> Result<String, BackendError> {
        let output = Command::new(&self.spec.program)
            .args(self.build_args(path))
            .output()
            .map_err(|err| {
                BackendError::new(format!("failed to run `{}`: {err}", self.spec.program))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BackendError::new(format!(
                "`{}` exited with {}: {}",
                self.spec.program,
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8(output.stdout).map_err(|err| {
            BackendError::new(format!(
                "`{}` produced non utf-8 output: {err}",
                self.spec.program
            ))
        })?;

        if options.preserve_line_breaks {
            Ok(text)
        } else {
            Ok(text.lines().collect::<Vec<_>>().join(" "))
        }
    }
}
