//! Workspace umbrella crate for document comparison.
//!
//! This crate stitches extraction, whitespace normalization and character
//! diffing together so callers can compare two documents with a single API
//! entry point.
//!
//! ```rust
//! use doccompare::{ComparisonPipeline, Document, DifferenceKind};
//!
//! let pipeline = ComparisonPipeline::default();
//! let old = Document::new("old.txt", "hello world".as_bytes().to_vec());
//! let new = Document::new("new.txt", "hello brave world\r\n".as_bytes().to_vec());
//!
//! let comparison = pipeline.compare(&old, &new).unwrap();
//! assert_eq!(comparison.len(), 1);
//! assert_eq!(comparison.differences[0].kind, DifferenceKind::Added);
//! assert_eq!(comparison.differences[0].value, "brave ");
//! ```

mod config;
mod error;
#[cfg(feature = "logging")]
mod logging;
mod pipeline;

pub use bytes::Bytes;
pub use canonical::{NormalizedText, normalize};
pub use extract::{
    BackendError, BackendRegistry, CommandBackend, CommandSpec, Document, ExtractConfig,
    ExtractError, ExtractOptions, ExtractionBackend, Extractor,
};
pub use textdiff::{
    Context, DiffAlgorithm, DiffConfig, DiffOp, Difference, DifferenceKind, OpTag, annotate,
    diff, find_differences,
};

pub use crate::config::{CompareConfig, ConfigLoadError, LoggingYamlConfig, PipelineYamlConfig};
pub use crate::error::{ComparisonError, DocumentSlot};
#[cfg(feature = "logging")]
pub use crate::logging::{LoggingInitError, init_tracing, init_tracing_from_config};
pub use crate::pipeline::{Comparison, ComparisonMetrics, ComparisonPipeline, compare_documents};
