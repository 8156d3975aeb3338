//! Extract → normalize → diff orchestration.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use canonical::normalize;
use extract::{Document, ExtractError, Extractor};
use serde::{Deserialize, Serialize};
use textdiff::{DiffConfig, Difference, DifferenceKind, find_differences};
use tracing::{Level, info, warn};

use crate::config::CompareConfig;
use crate::error::{ComparisonError, DocumentSlot};

/// Metrics observer for pipeline stages.
///
/// Injected per pipeline with [`ComparisonPipeline::with_metrics`]; there is
/// no process-wide recorder.
pub trait ComparisonMetrics: Send + Sync {
    fn record_extraction(
        &self,
        document: DocumentSlot,
        latency: Duration,
        result: Result<(), &ExtractError>,
    );
    fn record_normalize(&self, latency: Duration);
    fn record_diff(&self, latency: Duration, differences: usize);
}

struct MetricsSpan<'a> {
    recorder: &'a dyn ComparisonMetrics,
    start: Instant,
}

impl<'a> MetricsSpan<'a> {
    fn start(recorder: Option<&'a dyn ComparisonMetrics>) -> Option<Self> {
        recorder.map(|recorder| Self {
            recorder,
            start: Instant::now(),
        })
    }

    fn record_extraction(self, document: DocumentSlot, result: Result<(), &ExtractError>) {
        self.recorder
            .record_extraction(document, self.start.elapsed(), result);
    }

    fn record_normalize(self) {
        self.recorder.record_normalize(self.start.elapsed());
    }

    fn record_diff(self, differences: usize) {
        self.recorder.record_diff(self.start.elapsed(), differences);
    }
}

/// Result of one comparison, in document order.
///
/// Serializes as `{"differences": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Comparison {
    pub differences: Vec<Difference>,
}

impl Comparison {
    /// True when the normalized texts were equal.
    pub fn is_identical(&self) -> bool {
        self.differences.is_empty()
    }

    pub fn len(&self) -> usize {
        self.differences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.differences.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Difference> {
        self.differences.iter()
    }

    pub fn added(&self) -> impl Iterator<Item = &Difference> {
        self.iter().filter(|d| d.kind == DifferenceKind::Added)
    }

    pub fn removed(&self) -> impl Iterator<Item = &Difference> {
        self.iter().filter(|d| d.kind == DifferenceKind::Removed)
    }

    pub fn into_differences(self) -> Vec<Difference> {
        self.differences
    }
}

impl IntoIterator for Comparison {
    type Item = Difference;
    type IntoIter = std::vec::IntoIter<Difference>;

    fn into_iter(self) -> Self::IntoIter {
        self.differences.into_iter()
    }
}

impl<'a> IntoIterator for &'a Comparison {
    type Item = &'a Difference;
    type IntoIter = std::slice::Iter<'a, Difference>;

    fn into_iter(self) -> Self::IntoIter {
        self.differences.iter()
    }
}

/// Compares pairs of documents.
///
/// Stateless between calls; share it behind an `Arc` or clone it (the
/// extractor and the metrics recorder are reference-counted).
#[derive(Clone)]
pub struct ComparisonPipeline {
    extractor: Arc<Extractor>,
    diff_config: DiffConfig,
    parallel_extraction: bool,
    metrics: Option<Arc<dyn ComparisonMetrics>>,
}

impl fmt::Debug for ComparisonPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComparisonPipeline")
            .field("extractor", &self.extractor)
            .field("diff_config", &self.diff_config)
            .field("parallel_extraction", &self.parallel_extraction)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}

impl Default for ComparisonPipeline {
    fn default() -> Self {
        Self::new(Extractor::default(), DiffConfig::default())
    }
}

impl ComparisonPipeline {
    pub fn new(extractor: Extractor, diff_config: DiffConfig) -> Self {
        Self {
            extractor: Arc::new(extractor),
            diff_config,
            parallel_extraction: true,
            metrics: None,
        }
    }

    /// Builds a pipeline from a validated [`CompareConfig`].
    pub fn from_config(config: &CompareConfig) -> Result<Self, ComparisonError> {
        config.validate()?;
        let extractor = config.build_extractor()?;
        Ok(Self::new(extractor, config.diff.clone())
            .with_parallel_extraction(config.pipeline.parallel_extraction))
    }

    /// Extract the two documents concurrently (`parallel` feature) or one
    /// after the other.
    pub fn with_parallel_extraction(mut self, enabled: bool) -> Self {
        self.parallel_extraction = enabled;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn ComparisonMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn extractor(&self) -> &Extractor {
        &self.extractor
    }

    pub fn diff_config(&self) -> &DiffConfig {
        &self.diff_config
    }

    /// Compares `doc1` (old) against `doc2` (new).
    ///
    /// Any extraction failure aborts the comparison. When both extractions
    /// fail, the error for `doc1` is returned.
    pub fn compare(&self, doc1: &Document, doc2: &Document) -> Result<Comparison, ComparisonError> {
        let start = Instant::now();
        let span = tracing::span!(
            Level::INFO,
            "compare.compare",
            doc1 = %doc1.name,
            doc2 = %doc2.name
        );
        let _guard = span.enter();

        let result = self
            .extract_pair(doc1, doc2)
            .map(|(text1, text2)| self.diff_texts(&text1, &text2));
        log_outcome(&result, start);
        result
    }

    /// Async variant of [`compare`](Self::compare). Extraction runs on the
    /// tokio blocking pool, so this must be awaited inside a tokio runtime.
    #[cfg(feature = "async")]
    pub async fn compare_async(
        &self,
        doc1: Document,
        doc2: Document,
    ) -> Result<Comparison, ComparisonError> {
        use tracing::Instrument;

        let start = Instant::now();
        let span = tracing::span!(
            Level::INFO,
            "compare.compare_async",
            doc1 = %doc1.name,
            doc2 = %doc2.name
        );

        async move {
            let first = self.spawn_extraction(DocumentSlot::First, doc1);
            let second = self.spawn_extraction(DocumentSlot::Second, doc2);
            let (first, second) = tokio::join!(first, second);

            let result = joined(DocumentSlot::First, first)
                .and_then(|text1| {
                    joined(DocumentSlot::Second, second).map(|text2| (text1, text2))
                })
                .map(|(text1, text2)| self.diff_texts(&text1, &text2));
            log_outcome(&result, start);
            result
        }
        .instrument(span)
        .await
    }

    #[cfg(feature = "async")]
    fn spawn_extraction(
        &self,
        document: DocumentSlot,
        doc: Document,
    ) -> tokio::task::JoinHandle<Result<String, ExtractError>> {
        let extractor = Arc::clone(&self.extractor);
        let metrics = self.metrics.clone();
        let span = tracing::Span::current();
        tokio::task::spawn_blocking(move || {
            span.in_scope(|| extract_recorded(&extractor, metrics.as_deref(), document, &doc))
        })
    }

    fn extract_pair(
        &self,
        doc1: &Document,
        doc2: &Document,
    ) -> Result<(String, String), ComparisonError> {
        #[cfg(feature = "parallel")]
        if self.parallel_extraction {
            let span = tracing::Span::current();
            let (first, second) = rayon::join(
                || span.in_scope(|| self.extract_one(DocumentSlot::First, doc1)),
                || span.in_scope(|| self.extract_one(DocumentSlot::Second, doc2)),
            );
            return Ok((first?, second?));
        }

        let first = self.extract_one(DocumentSlot::First, doc1)?;
        let second = self.extract_one(DocumentSlot::Second, doc2)?;
        Ok((first, second))
    }

    fn extract_one(&self, document: DocumentSlot, doc: &Document) -> Result<String, ComparisonError> {
        extract_recorded(&self.extractor, self.metrics.as_deref(), document, doc)
            .map_err(|err| ComparisonError::extraction(document, err))
    }

    /// Normalize both texts and diff them. Never fails.
    fn diff_texts(&self, text1: &str, text2: &str) -> Comparison {
        let metrics = self.metrics.as_deref();

        let normalize_span = MetricsSpan::start(metrics);
        let normalized1 = normalize(text1);
        let normalized2 = normalize(text2);
        if let Some(span) = normalize_span {
            span.record_normalize();
        }

        let diff_span = MetricsSpan::start(metrics);
        let differences = if normalized1 == normalized2 {
            Vec::new()
        } else {
            find_differences(&normalized1, &normalized2, &self.diff_config)
        };
        if let Some(span) = diff_span {
            span.record_diff(differences.len());
        }

        Comparison { differences }
    }
}

fn extract_recorded(
    extractor: &Extractor,
    metrics: Option<&dyn ComparisonMetrics>,
    document: DocumentSlot,
    doc: &Document,
) -> Result<String, ExtractError> {
    let span = MetricsSpan::start(metrics);
    let result = extractor.extract(doc);
    if let Some(span) = span {
        span.record_extraction(document, result.as_ref().map(|_| ()));
    }
    result
}

#[cfg(feature = "async")]
fn joined(
    document: DocumentSlot,
    outcome: Result<Result<String, ExtractError>, tokio::task::JoinError>,
) -> Result<String, ComparisonError> {
    match outcome {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(err)) => Err(ComparisonError::extraction(document, err)),
        Err(err) => Err(ComparisonError::TaskFailed(format!("{document} document: {err}"))),
    }
}

fn log_outcome(result: &Result<Comparison, ComparisonError>, start: Instant) {
    let elapsed_micros = start.elapsed().as_micros();
    match result {
        Ok(comparison) => info!(
            differences = comparison.len(),
            added = comparison.added().count(),
            removed = comparison.removed().count(),
            elapsed_micros,
            "compare_success"
        ),
        Err(err) => warn!(error = %err, elapsed_micros, "compare_failure"),
    }
}

/// Compares two documents with the default pipeline: text-native formats
/// only, Myers diff, 30 characters of context.
pub fn compare_documents(
    doc1: &Document,
    doc2: &Document,
) -> Result<Vec<Difference>, ComparisonError> {
    ComparisonPipeline::default()
        .compare(doc1, doc2)
        .map(Comparison::into_differences)
}
