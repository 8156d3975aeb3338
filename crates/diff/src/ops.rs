//! Character-level edit scripts.
//!
//! # Shape of the output
//!
//! [`diff`] returns runs, not single characters: adjacent ops never share a
//! tag, and every maximal changed region between two equal runs is reported
//! as at most one [`OpTag::Delete`] followed by at most one [`OpTag::Insert`].
//!
//! # Determinism
//!
//! The alignment is always computed from the lexicographically smaller text
//! towards the larger one and mirrored when the caller's order is the other
//! way round. Swapping the inputs therefore swaps Delete and Insert and changes
//! nothing else. Within one direction the choice among equally short scripts
//! is the one `similar`'s implementation makes, which is fixed for a given
//! input. Common prefixes and suffixes always come out as Equal.

use serde::{Deserialize, Serialize};
use similar::{ChangeTag, TextDiff};

use crate::config::DiffConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpTag {
    Equal,
    Insert,
    Delete,
}

impl OpTag {
    fn inverse(self) -> Self {
        match self {
            OpTag::Equal => OpTag::Equal,
            OpTag::Insert => OpTag::Delete,
            OpTag::Delete => OpTag::Insert,
        }
    }
}

impl From<ChangeTag> for OpTag {
    fn from(value: ChangeTag) -> Self {
        match value {
            ChangeTag::Equal => OpTag::Equal,
            ChangeTag::Insert => OpTag::Insert,
            ChangeTag::Delete => OpTag::Delete,
        }
    }
}

/// One run of the edit script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffOp {
    pub tag: OpTag,
    pub value: String,
}

impl DiffOp {
    pub fn new(tag: OpTag, value: impl Into<String>) -> Self {
        Self {
            tag,
            value: value.into(),
        }
    }

    pub fn is_change(&self) -> bool {
        self.tag != OpTag::Equal
    }

    /// Length in Unicode scalar values.
    pub fn char_len(&self) -> usize {
        self.value.chars().count()
    }
}

/// Computes the character-level edit script turning `old` into `new`.
pub fn diff(old: &str, new: &str, config: &DiffConfig) -> Vec<DiffOp> {
    if old == new {
        return if old.is_empty() {
            Vec::new()
        } else {
            vec![DiffOp::new(OpTag::Equal, old)]
        };
    }

    if old <= new {
        raw_diff(old, new, config, false)
    } else {
        raw_diff(new, old, config, true)
    }
}

fn raw_diff(old: &str, new: &str, config: &DiffConfig, mirrored: bool) -> Vec<DiffOp> {
    let text_diff = TextDiff::configure()
        .algorithm(config.algorithm.into())
        .diff_chars(old, new);

    let mut builder = OpBuilder::default();
    for change in text_diff.iter_all_changes() {
        let tag = OpTag::from(change.tag());
        let tag = if mirrored { tag.inverse() } else { tag };
        builder.push(tag, change.value());
    }
    builder.finish()
}

/// Concatenation of Equal and Delete runs: the old text.
pub fn reconstruct_old(ops: &[DiffOp]) -> String {
    reconstruct(ops, OpTag::Delete)
}

/// Concatenation of Equal and Insert runs: the new text.
pub fn reconstruct_new(ops: &[DiffOp]) -> String {
    reconstruct(ops, OpTag::Insert)
}

fn reconstruct(ops: &[DiffOp], side: OpTag) -> String {
    ops.iter()
        .filter(|op| op.tag == OpTag::Equal || op.tag == side)
        .map(|op| op.value.as_str())
        .collect()
}

/// Merges per-character changes into runs, holding deletions and insertions
/// of the current changed region until the next equal run (or the end).
#[derive(Default)]
struct OpBuilder {
    ops: Vec<DiffOp>,
    deleted: String,
    inserted: String,
}

impl OpBuilder {
    fn push(&mut self, tag: OpTag, value: &str) {
        match tag {
            OpTag::Delete => self.deleted.push_str(value),
            OpTag::Insert => self.inserted.push_str(value),
            OpTag::Equal => {
                self.flush_changes();
                match self.ops.last_mut() {
                    Some(last) if last.tag == OpTag::Equal => last.value.push_str(value),
                    _ => self.ops.push(DiffOp::new(OpTag::Equal, value)),
                }
            }
        }
    }

    fn flush_changes(&mut self) {
        if !self.deleted.is_empty() {
            let value = std::mem::take(&mut self.deleted);
            self.ops.push(DiffOp::new(OpTag::Delete, value));
        }
        if !self.inserted.is_empty() {
            let value = std::mem::take(&mut self.inserted);
            self.ops.push(DiffOp::new(OpTag::Insert, value));
        }
    }

    fn finish(mut self) -> Vec<DiffOp> {
        self.flush_changes();
        self.ops
    }
}
