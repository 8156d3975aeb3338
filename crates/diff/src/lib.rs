//! Character-level diff engine.
//!
//! Two stages:
//!
//! 1. [`diff`] computes a run-length edit script ([`DiffOp`]s) between two
//!    texts, one character at a time, using `similar` (Myers by default).
//! 2. [`annotate`] turns every non-equal run into a [`Difference`] carrying a
//!    running position and up to [`DEFAULT_CONTEXT_CHARS`] characters of
//!    context on each side.
//!
//! [`find_differences`] runs both.
//!
//! ## Invariants
//!
//! - Equal + Delete runs concatenate to the old text, Equal + Insert runs to
//!   the new one ([`reconstruct_old`], [`reconstruct_new`]).
//! - Both stages are pure, total and deterministic.
//! - `context.before` and `context.after` never exceed the configured budget.
//!
//! ```rust
//! use textdiff::{find_differences, DiffConfig, DifferenceKind};
//!
//! let diffs = find_differences("hello world", "hello brave world", &DiffConfig::default());
//! assert_eq!(diffs.len(), 1);
//! assert_eq!(diffs[0].kind, DifferenceKind::Added);
//! assert_eq!(diffs[0].value, "brave ");
//! assert_eq!(diffs[0].context.before, "hello ");
//! assert_eq!(diffs[0].context.after, "world");
//! ```

use tracing::{debug, Level};

mod annotate;
mod config;
mod ops;

pub use crate::annotate::{annotate, Context, Difference, DifferenceKind};
pub use crate::config::{DiffAlgorithm, DiffConfig, DiffConfigError, DEFAULT_CONTEXT_CHARS};
pub use crate::ops::{diff, reconstruct_new, reconstruct_old, DiffOp, OpTag};

/// Diff `old` against `new` and annotate the result. Equal inputs yield no
/// differences.
pub fn find_differences(old: &str, new: &str, config: &DiffConfig) -> Vec<Difference> {
    if old == new {
        return Vec::new();
    }

    let span = tracing::span!(
        Level::DEBUG,
        "diff.find_differences",
        algorithm = ?config.algorithm,
        old_len = old.len(),
        new_len = new.len()
    );
    let _guard = span.enter();

    let ops = diff(old, new, config);
    let differences = annotate(&ops, config);
    debug!(
        ops = ops.len(),
        differences = differences.len(),
        "diff_complete"
    );
    differences
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn find(old: &str, new: &str) -> Vec<Difference> {
        find_differences(old, new, &DiffConfig::default())
    }

    #[test]
    fn identical_texts_have_no_differences() {
        assert!(find("", "").is_empty());
        assert!(find("a\nb", "a\nb").is_empty());
    }

    #[test]
    fn insertion_scenario() {
        let diffs = find("hello world", "hello brave world");
        assert_eq!(
            diffs,
            vec![Difference {
                kind: DifferenceKind::Added,
                value: "brave ".into(),
                position: 6,
                context: Context {
                    before: "hello ".into(),
                    after: "world".into(),
                },
            }]
        );
    }

    #[test]
    fn empty_against_single_char() {
        let diffs = find("", "x");
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].kind, DifferenceKind::Added);
        assert_eq!(diffs[0].value, "x");
        assert_eq!(diffs[0].context, Context::default());

        let diffs = find("x", "");
        assert_eq!(diffs[0].kind, DifferenceKind::Removed);
    }

    #[test]
    fn differences_follow_document_order() {
        let diffs = find("one two three", "one 2 three four");
        let positions: Vec<usize> = diffs.iter().map(|d| d.position).collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
        assert!(diffs.iter().any(|d| d.kind == DifferenceKind::Added && d.value.ends_with("four")));
    }

    fn values(diffs: &[Difference], kind: DifferenceKind) -> Vec<String> {
        diffs
            .iter()
            .filter(|d| d.kind == kind)
            .map(|d| d.value.clone())
            .collect()
    }

    proptest! {
        #[test]
        fn context_never_exceeds_budget(a in "[ab \n]{0,80}", b in "[ab \n]{0,80}") {
            for d in find(&a, &b) {
                prop_assert!(d.context.before.chars().count() <= DEFAULT_CONTEXT_CHARS);
                prop_assert!(d.context.after.chars().count() <= DEFAULT_CONTEXT_CHARS);
            }
        }

        #[test]
        fn swapping_inputs_swaps_kinds(a in "[abc ]{0,30}", b in "[abc ]{0,30}") {
            let forward = find(&a, &b);
            let backward = find(&b, &a);
            prop_assert_eq!(forward.len(), backward.len());
            prop_assert_eq!(
                values(&forward, DifferenceKind::Added),
                values(&backward, DifferenceKind::Removed)
            );
            prop_assert_eq!(
                values(&forward, DifferenceKind::Removed),
                values(&backward, DifferenceKind::Added)
            );
        }

        #[test]
        fn one_difference_per_change_run(a in "[abc]{0,30}", b in "[abc]{0,30}") {
            let script = diff(&a, &b, &DiffConfig::default());
            let changes = script.iter().filter(|op| op.is_change()).count();
            prop_assert_eq!(find(&a, &b).len(), changes);
        }
    }
}
