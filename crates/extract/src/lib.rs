//! Text extraction layer.
//!
//! This is where documents enter the comparison pipeline. We take raw bytes
//! plus a declared file name and hand back plain text.
//!
//! ## What we do here
//!
//! - **Text-native formats** (`.txt`, `.md`, `.json`, ...) are decoded
//!   in-process as UTF-8. No backend, no disk.
//! - **Everything else** goes through a backend registered for the extension
//!   in a [`BackendRegistry`]. The bytes are staged in a scoped temporary file
//!   that is removed on every exit path.
//! - **Unknown formats** fail fast with [`ExtractError::UnsupportedFormat`].
//! - **Log everything** - structured events via tracing with timings.
//!
//! ## Example
//!
//! ```
//! use extract::{Document, Extractor};
//!
//! let extractor = Extractor::default();
//! let doc = Document::new("note.txt", "café".as_bytes().to_vec());
//! assert_eq!(extractor.extract(&doc).unwrap(), "café");
//! ```
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn, Level};

mod backend;
mod config;
mod error;
mod temp;
mod types;

use crate::temp::ScopedTempFile;

pub use crate::backend::{
    BackendError, BackendRegistry, CommandBackend, CommandSpec, ExtractOptions,
    ExtractionBackend, PATH_PLACEHOLDER,
};
pub use crate::config::{ConfigError, ExtractConfig, DEFAULT_TEXT_EXTENSIONS};
pub use crate::error::ExtractError;
pub use crate::types::{extension_of, Document};

const UTF8_BOM: &str = "\u{feff}";

/// Converts documents into plain text.
///
/// Holds the configuration and the injected backend registry. Cheap to share
/// behind an `Arc`; all methods take `&self`.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    config: ExtractConfig,
    backends: BackendRegistry,
}

impl Extractor {
    /// Builds an extractor from a validated config and an explicit registry.
    pub fn new(config: ExtractConfig, backends: BackendRegistry) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, backends })
    }

    /// Builds an extractor whose registry holds one [`CommandBackend`] per
    /// entry of [`ExtractConfig::commands`].
    pub fn from_config(config: ExtractConfig) -> Result<Self, ConfigError> {
        let mut backends = BackendRegistry::new();
        for (ext, spec) in &config.commands {
            backends.register(ext, Arc::new(CommandBackend::new(spec.clone())));
        }
        Self::new(config, backends)
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    pub fn backends(&self) -> &BackendRegistry {
        &self.backends
    }

    /// True when some path (text-native or backend) exists for `extension`.
    pub fn supports(&self, extension: &str) -> bool {
        self.config.is_text_native(extension) || self.backends.contains(extension)
    }

    /// Extract plain text from `doc`.
    pub fn extract(&self, doc: &Document) -> Result<String, ExtractError> {
        let start = Instant::now();
        let extension = doc.extension();
        let span = tracing::span!(
            Level::INFO,
            "extract.extract",
            file_name = %doc.name,
            extension = %extension,
            bytes = doc.len()
        );
        let _guard = span.enter();

        match self.extract_inner(doc, &extension) {
            Ok((text, path)) => {
                let elapsed_micros = start.elapsed().as_micros();
                info!(
                    path,
                    text_len = text.len(),
                    elapsed_micros,
                    "extract_success"
                );
                Ok(text)
            }
            Err(err) => {
                let elapsed_micros = start.elapsed().as_micros();
                warn!(error = %err, elapsed_micros, "extract_failure");
                Err(err)
            }
        }
    }

    fn extract_inner(
        &self,
        doc: &Document,
        extension: &str,
    ) -> Result<(String, &'static str), ExtractError> {
        if self.config.is_text_native(extension) {
            return decode_text(doc, self.config.strict_utf8).map(|text| (text, "text_native"));
        }

        let backend = self
            .backends
            .get(extension)
            .ok_or_else(|| ExtractError::UnsupportedFormat {
                file_name: doc.name.clone(),
                extension: extension.to_string(),
            })?;

        self.extract_with_backend(doc, extension, backend.as_ref())
            .map(|text| (text, "backend"))
    }

    fn extract_with_backend(
        &self,
        doc: &Document,
        extension: &str,
        backend: &dyn ExtractionBackend,
    ) -> Result<String, ExtractError> {
        let scoped = ScopedTempFile::create(&doc.bytes, extension, self.config.temp_dir.as_deref())
            .map_err(|err| ExtractError::TempFile(format!("{}: {err}", doc.name)))?;

        let result = backend.extract_from_path(scoped.path(), &ExtractOptions::default());
        drop(scoped);

        result.map_err(|err| ExtractError::Backend {
            file_name: doc.name.clone(),
            message: format!("{}: {}", backend.name(), err.message()),
        })
    }
}

/// Decodes a text-native document. A leading byte-order mark is dropped.
fn decode_text(doc: &Document, strict: bool) -> Result<String, ExtractError> {
    let text = if strict {
        std::str::from_utf8(&doc.bytes)
            .map_err(|err| ExtractError::InvalidUtf8 {
                file_name: doc.name.clone(),
                message: err.to_string(),
            })?
            .to_owned()
    } else {
        String::from_utf8_lossy(&doc.bytes).into_owned()
    };

    match text.strip_prefix(UTF8_BOM) {
        Some(rest) => Ok(rest.to_owned()),
        None => Ok(text),
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    use super::*;

    /// Backend that records the path it saw and whether the file existed.
    #[derive(Debug, Default)]
    struct Recording {
        seen: Mutex<Vec<(PathBuf, Vec<u8>)>>,
        fail: bool,
        output: &'static str,
    }

    impl ExtractionBackend for Recording {
        fn name(&self) -> &str {
            "recording"
        }

        fn extract_from_path(
            &self,
            path: &Path,
            options: &ExtractOptions,
        ) -> Result<String, BackendError> {
            assert!(options.preserve_line_breaks);
            let bytes = std::fs::read(path).map_err(|e| BackendError::new(e.to_string()))?;
            self.seen
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .push((path.to_path_buf(), bytes));
            if self.fail {
                Err(BackendError::new("corrupt file"))
            } else {
                Ok(self.output.to_string())
            }
        }
    }

    fn extractor_with(backend: Arc<Recording>) -> Extractor {
        let registry = BackendRegistry::new().with_backend(".pdf", backend);
        Extractor::new(ExtractConfig::default(), registry).expect("valid config")
    }

    #[test]
    fn text_native_decodes_utf8_exactly() {
        let doc = Document::new("note.txt", "café".as_bytes().to_vec());
        let text = Extractor::default().extract(&doc).expect("extract");
        assert_eq!(text, "café");
    }

    #[test]
    fn text_native_extension_is_case_insensitive() {
        let doc = Document::new("DATA.JSON", b"{\"a\":1}".to_vec());
        let text = Extractor::default().extract(&doc).expect("extract");
        assert_eq!(text, "{\"a\":1}");
    }

    #[test]
    fn empty_text_native_file_is_empty_string() {
        let doc = Document::new("empty.md", Vec::new());
        assert_eq!(Extractor::default().extract(&doc).expect("extract"), "");
    }

    #[test]
    fn bom_is_stripped() {
        let doc = Document::new("bom.csv", b"\xEF\xBB\xBFa,b".to_vec());
        assert_eq!(Extractor::default().extract(&doc).expect("extract"), "a,b");
    }

    #[test]
    fn lossy_decoding_by_default() {
        let doc = Document::new("bad.txt", vec![b'a', 0xff, b'b']);
        let text = Extractor::default().extract(&doc).expect("lossy decode");
        assert_eq!(text, "a\u{fffd}b");
    }

    #[test]
    fn strict_decoding_rejects_invalid_utf8() {
        let cfg = ExtractConfig {
            strict_utf8: true,
            ..Default::default()
        };
        let extractor = Extractor::new(cfg, BackendRegistry::new()).expect("valid");
        let doc = Document::new("bad.txt", vec![0xff, 0xfe]);
        let err = extractor.extract(&doc).expect_err("strict decode fails");
        assert!(matches!(err, ExtractError::InvalidUtf8 { .. }));
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let doc = Document::new("scan.tiff", vec![1, 2, 3]);
        let err = Extractor::default().extract(&doc).expect_err("unsupported");
        assert_eq!(
            err,
            ExtractError::UnsupportedFormat {
                file_name: "scan.tiff".into(),
                extension: ".tiff".into(),
            }
        );
    }

    #[test]
    fn missing_extension_is_unsupported() {
        let doc = Document::new("README", b"hello".to_vec());
        let err = Extractor::default().extract(&doc).expect_err("unsupported");
        assert!(err.is_unsupported_format());
    }

    #[test]
    fn backend_receives_bytes_and_temp_file_is_removed() {
        let backend = Arc::new(Recording {
            output: "extracted text",
            ..Default::default()
        });
        let extractor = extractor_with(Arc::clone(&backend));
        let doc = Document::new("Report.PDF", b"%PDF-1.7".to_vec());

        let text = extractor.extract(&doc).expect("backend succeeds");
        assert_eq!(text, "extracted text");

        let seen = backend.seen.lock().expect("lock");
        assert_eq!(seen.len(), 1);
        let (path, bytes) = &seen[0];
        assert_eq!(bytes, b"%PDF-1.7");
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("pdf"));
        assert!(!path.exists(), "temp file must be removed after success");
    }

    #[test]
    fn temp_file_is_removed_when_backend_fails() {
        let backend = Arc::new(Recording {
            fail: true,
            ..Default::default()
        });
        let extractor = extractor_with(Arc::clone(&backend));
        let doc = Document::new("broken.pdf", b"garbage".to_vec());

        let err = extractor.extract(&doc).expect_err("backend fails");
        assert_eq!(
            err,
            ExtractError::Backend {
                file_name: "broken.pdf".into(),
                message: "recording: corrupt file".into(),
            }
        );

        let seen = backend.seen.lock().expect("lock");
        assert!(!seen[0].0.exists(), "temp file must be removed after failure");
    }

    #[test]
    fn empty_backend_output_is_empty_text() {
        let backend = Arc::new(Recording::default());
        let extractor = extractor_with(backend);
        let doc = Document::new("blank.pdf", Vec::new());
        assert_eq!(extractor.extract(&doc).expect("extract"), "");
    }

    #[test]
    fn temp_dir_is_honoured() {
        let dir = tempfile::tempdir().expect("tempdir");
        let backend = Arc::new(Recording::default());
        let cfg = ExtractConfig {
            temp_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        let registry = BackendRegistry::new().with_backend("pdf", backend.clone());
        let extractor = Extractor::new(cfg, registry).expect("valid");
        extractor
            .extract(&Document::new("x.pdf", b"x".to_vec()))
            .expect("extract");

        let seen = backend.seen.lock().expect("lock");
        assert!(seen[0].0.starts_with(dir.path()));
    }

    #[test]
    fn from_config_registers_commands() {
        let mut cfg = ExtractConfig::default();
        cfg.commands.insert(
            ".pdf".into(),
            CommandSpec {
                program: "pdftotext".into(),
                args: vec!["{path}".into(), "-".into()],
            },
        );
        let extractor = Extractor::from_config(cfg).expect("valid");
        assert!(extractor.supports(".pdf"));
        assert!(extractor.supports(".txt"));
        assert!(!extractor.supports(".docx"));
        assert_eq!(
            extractor.backends().get("pdf").map(|b| b.name().to_string()),
            Some("pdftotext".to_string())
        );
    }

    #[test]
    fn invalid_config_rejected_at_construction() {
        let cfg = ExtractConfig {
            text_extensions: vec!["txt".into()],
            ..Default::default()
        };
        assert!(Extractor::new(cfg, BackendRegistry::new()).is_err());
    }
}
