//! Turning an edit script into context-annotated differences.
//!
//! Every Insert or Delete run becomes one [`Difference`], in script order.
//!
//! # Context
//!
//! `before` is built by walking back from the change and `after` by walking
//! forward. Only Equal runs contribute text; Insert/Delete runs met on the way
//! are skipped without ending the walk. Each Equal run gives up at most the
//! characters still missing from the budget (its tail for `before`, its head
//! for `after`) and the walk stops once the budget is spent.
//!
//! # Position
//!
//! `position` is a running count of characters over *all* runs, Equal, Insert
//! and Delete alike. It orders differences along the merged script; it is not
//! an offset into either input text.

use serde::{Deserialize, Serialize};

use crate::config::DiffConfig;
use crate::ops::{DiffOp, OpTag};

/// Wire tags follow the consumer contract: `aggiunta` / `rimozione`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DifferenceKind {
    #[serde(rename = "aggiunta")]
    Added,
    #[serde(rename = "rimozione")]
    Removed,
}

impl DifferenceKind {
    fn from_tag(tag: OpTag) -> Option<Self> {
        match tag {
            OpTag::Insert => Some(DifferenceKind::Added),
            OpTag::Delete => Some(DifferenceKind::Removed),
            OpTag::Equal => None,
        }
    }

    /// The serialized tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            DifferenceKind::Added => "aggiunta",
            DifferenceKind::Removed => "rimozione",
        }
    }

    pub fn inverse(self) -> Self {
        match self {
            DifferenceKind::Added => DifferenceKind::Removed,
            DifferenceKind::Removed => DifferenceKind::Added,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Context {
    pub before: String,
    pub after: String,
}

/// One reported insertion or removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Difference {
    #[serde(rename = "type")]
    pub kind: DifferenceKind,
    pub value: String,
    /// Character offset along the merged edit script.
    pub position: usize,
    pub context: Context,
}

/// Annotates every change in `ops` with its position and context.
pub fn annotate(ops: &[DiffOp], config: &DiffConfig) -> Vec<Difference> {
    let budget = config.context_chars;
    let mut differences = Vec::new();
    let mut position = 0usize;

    for (index, op) in ops.iter().enumerate() {
        if let Some(kind) = DifferenceKind::from_tag(op.tag) {
            differences.push(Difference {
                kind,
                value: op.value.clone(),
                position,
                context: Context {
                    before: context_before(ops, index, budget),
                    after: context_after(ops, index, budget),
                },
            });
        }
        position += op.char_len();
    }

    differences
}

fn context_before(ops: &[DiffOp], index: usize, budget: usize) -> String {
    let mut chunks: Vec<&str> = Vec::new();
    let mut taken = 0;
    for op in ops[..index].iter().rev() {
        if taken >= budget {
            break;
        }
        if op.tag != OpTag::Equal {
            continue;
        }
        let chunk = tail_chars(&op.value, budget - taken);
        taken += chunk.chars().count();
        chunks.push(chunk);
    }
    // Closest chunk was found first; it has to end up next to the change.
    chunks.into_iter().rev().collect()
}

fn context_after(ops: &[DiffOp], index: usize, budget: usize) -> String {
    let mut context = String::new();
    let mut taken = 0;
    for op in &ops[index + 1..] {
        if taken >= budget {
            break;
        }
        if op.tag != OpTag::Equal {
            continue;
        }
        let chunk = head_chars(&op.value, budget - taken);
        taken += chunk.chars().count();
        context.push_str(chunk);
    }
    context
}

/// Last `n` characters of `s` (all of it when shorter).
fn tail_chars(s: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }
    match s.char_indices().rev().nth(n - 1) {
        Some((idx, _)) => &s[idx..],
        None => s,
    }
}

/// First `n` characters of `s` (all of it when shorter).
fn head_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
