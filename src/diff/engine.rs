//! Line-level diff engine
//!
//! [`DiffEngine`] is the seam between the position tracker and whatever
//! computes the edit script. [`LineDiffEngine`] is the default, built on
//! the Myers implementation in `similar`.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use similar::{capture_diff_slices_deadline, Algorithm, DiffOp};
use tracing::{debug, warn};

use super::lines::split_lines;
use super::script::{EditScript, EditSpan, ScriptError};

/// Default time budget for [`Precision::Fast`]
pub const DEFAULT_FAST_DEADLINE: Duration = Duration::from_millis(50);

/// How hard the engine works for a minimal script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precision {
    /// Minimal script, no time limit. For explicit one-off comparisons.
    Exact,
    /// Bounded time, possibly non-minimal script. For remaps on every edit.
    Fast,
}

/// Computes an edit script between two line sequences
///
/// Implementations return raw spans; [`diff_lines`] validates them before
/// anything consumes them. Both precisions must produce a valid partition.
pub trait DiffEngine: Send + Sync {
    fn compute(&self, old: &[&str], new: &[&str], precision: Precision) -> Vec<EditSpan>;
}

/// Myers line diff with a deadline for [`Precision::Fast`]
#[derive(Debug, Clone)]
pub struct LineDiffEngine {
    fast_deadline: Duration,
}

impl Default for LineDiffEngine {
    fn default() -> Self {
        Self::new(DEFAULT_FAST_DEADLINE)
    }
}

impl LineDiffEngine {
    pub fn new(fast_deadline: Duration) -> Self {
        Self { fast_deadline }
    }

    pub fn fast_deadline(&self) -> Duration {
        self.fast_deadline
    }
}

impl DiffEngine for LineDiffEngine {
    fn compute(&self, old: &[&str], new: &[&str], precision: Precision) -> Vec<EditSpan> {
        let deadline = match precision {
            Precision::Exact => None,
            Precision::Fast => Some(Instant::now() + self.fast_deadline),
        };

        capture_diff_slices_deadline(Algorithm::Myers, old, new, deadline)
            .iter()
            .map(span_from_op)
            .collect()
    }
}

fn span_from_op(op: &DiffOp) -> EditSpan {
    match *op {
        DiffOp::Equal {
            old_index,
            new_index,
            len,
        } => EditSpan::unchanged(old_index, new_index, len),
        DiffOp::Insert {
            old_index,
            new_index,
            new_len,
        } => EditSpan::inserted(old_index, new_index, new_len),
        DiffOp::Delete {
            old_index,
            old_len,
            new_index,
        } => EditSpan::deleted(old_index, old_len, new_index),
        DiffOp::Replace {
            old_index,
            old_len,
            new_index,
            new_len,
        } => EditSpan::replaced(old_index, old_len, new_index, new_len),
    }
}

/// Run `engine` over two line sequences and validate the result
pub fn diff_lines<E: DiffEngine + ?Sized>(
    engine: &E,
    old: &[&str],
    new: &[&str],
    precision: Precision,
) -> Result<EditScript, ScriptError> {
    let spans = engine.compute(old, new, precision);
    let span_count = spans.len();

    let script = EditScript::new(spans, old.len(), new.len()).map_err(|e| {
        warn!(error = %e, "Diff engine produced a malformed edit script");
        e
    })?;

    debug!(
        old_lines = old.len(),
        new_lines = new.len(),
        spans = span_count,
        ?precision,
        "Computed edit script"
    );
    Ok(script)
}

/// Split both texts into lines and diff them
pub fn diff_texts<E: DiffEngine + ?Sized>(
    engine: &E,
    reference: &str,
    current: &str,
    precision: Precision,
) -> Result<EditScript, ScriptError> {
    let old = split_lines(reference);
    let new = split_lines(current);
    diff_lines(engine, &old, &new, precision)
}
