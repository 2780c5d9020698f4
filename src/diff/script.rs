//! Edit script data types
//!
//! An [`EditScript`] relates an old line sequence to a new one as an
//! ordered, gap-free run of [`EditSpan`]s. Scripts are only constructed
//! through [`EditScript::new`], which checks the partition invariants, so
//! every consumer can scan spans without re-validating them.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a span relates old lines to new lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanStatus {
    /// Same lines on both sides
    Unchanged,
    /// Lines only present in the new text
    Inserted,
    /// Lines only present in the old text
    Deleted,
    /// Old lines rewritten into (possibly a different number of) new lines
    Replaced,
}

impl SpanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpanStatus::Unchanged => "unchanged",
            SpanStatus::Inserted => "inserted",
            SpanStatus::Deleted => "deleted",
            SpanStatus::Replaced => "replaced",
        }
    }

    /// Whether the span differs from the old text
    pub fn is_change(&self) -> bool {
        !matches!(self, SpanStatus::Unchanged)
    }
}

impl fmt::Display for SpanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One contiguous block of the edit script (all indices 0-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditSpan {
    /// First line of the block in the old text
    pub source_index: usize,
    /// Number of old lines covered
    pub source_length: usize,
    /// First line of the block in the new text
    pub dest_index: usize,
    /// Number of new lines covered
    pub dest_length: usize,
    pub status: SpanStatus,
}

impl EditSpan {
    pub fn unchanged(source_index: usize, dest_index: usize, length: usize) -> Self {
        Self {
            source_index,
            source_length: length,
            dest_index,
            dest_length: length,
            status: SpanStatus::Unchanged,
        }
    }

    pub fn inserted(source_index: usize, dest_index: usize, dest_length: usize) -> Self {
        Self {
            source_index,
            source_length: 0,
            dest_index,
            dest_length,
            status: SpanStatus::Inserted,
        }
    }

    pub fn deleted(source_index: usize, source_length: usize, dest_index: usize) -> Self {
        Self {
            source_index,
            source_length,
            dest_index,
            dest_length: 0,
            status: SpanStatus::Deleted,
        }
    }

    pub fn replaced(
        source_index: usize,
        source_length: usize,
        dest_index: usize,
        dest_length: usize,
    ) -> Self {
        Self {
            source_index,
            source_length,
            dest_index,
            dest_length,
            status: SpanStatus::Replaced,
        }
    }

    /// Whether 0-based old line `index` falls inside this span
    pub fn contains_source(&self, index: usize) -> bool {
        index >= self.source_index && index - self.source_index < self.source_length
    }

    /// Whether 0-based new line `index` falls inside this span
    pub fn contains_dest(&self, index: usize) -> bool {
        index >= self.dest_index && index - self.dest_index < self.dest_length
    }

    fn has_valid_shape(&self) -> bool {
        match self.status {
            SpanStatus::Unchanged => true,
            SpanStatus::Inserted => self.source_length == 0 && self.dest_length > 0,
            SpanStatus::Deleted => self.source_length > 0 && self.dest_length == 0,
            SpanStatus::Replaced => self.source_length > 0 && self.dest_length > 0,
        }
    }
}

/// Contract violations by a diff engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error("Span {span} starts at old line {found}, expected {expected}")]
    SourceGap {
        span: usize,
        expected: usize,
        found: usize,
    },

    #[error("Span {span} starts at new line {found}, expected {expected}")]
    DestGap {
        span: usize,
        expected: usize,
        found: usize,
    },

    #[error("Unchanged span {span} has unequal lengths: {source_length} != {dest_length}")]
    LengthMismatch {
        span: usize,
        source_length: usize,
        dest_length: usize,
    },

    #[error("{status} span {span} has invalid lengths: old {source_length}, new {dest_length}")]
    InvalidShape {
        span: usize,
        status: SpanStatus,
        source_length: usize,
        dest_length: usize,
    },

    #[error("Span {span} runs past the addressable line range")]
    Overflow { span: usize },

    #[error("Script covers {covered} old lines, text has {expected}")]
    SourceCoverage { covered: usize, expected: usize },

    #[error("Script covers {covered} new lines, text has {expected}")]
    DestCoverage { covered: usize, expected: usize },
}

/// Validated sequence of spans for one (old, new) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditScript {
    spans: Vec<EditSpan>,
    source_len: usize,
    dest_len: usize,
}

impl EditScript {
    /// Build a script, checking that `spans` partition both
    /// `[0, source_len)` and `[0, dest_len)` in order
    pub fn new(
        spans: Vec<EditSpan>,
        source_len: usize,
        dest_len: usize,
    ) -> Result<Self, ScriptError> {
        let mut source_pos = 0;
        let mut dest_pos = 0;

        for (i, span) in spans.iter().enumerate() {
            if span.source_index != source_pos {
                return Err(ScriptError::SourceGap {
                    span: i,
                    expected: source_pos,
                    found: span.source_index,
                });
            }
            if span.dest_index != dest_pos {
                return Err(ScriptError::DestGap {
                    span: i,
                    expected: dest_pos,
                    found: span.dest_index,
                });
            }
            if span.status == SpanStatus::Unchanged && span.source_length != span.dest_length {
                return Err(ScriptError::LengthMismatch {
                    span: i,
                    source_length: span.source_length,
                    dest_length: span.dest_length,
                });
            }
            if !span.has_valid_shape() {
                return Err(ScriptError::InvalidShape {
                    span: i,
                    status: span.status,
                    source_length: span.source_length,
                    dest_length: span.dest_length,
                });
            }

            source_pos = source_pos
                .checked_add(span.source_length)
                .ok_or(ScriptError::Overflow { span: i })?;
            dest_pos = dest_pos
                .checked_add(span.dest_length)
                .ok_or(ScriptError::Overflow { span: i })?;
        }

        if source_pos != source_len {
            return Err(ScriptError::SourceCoverage {
                covered: source_pos,
                expected: source_len,
            });
        }
        if dest_pos != dest_len {
            return Err(ScriptError::DestCoverage {
                covered: dest_pos,
                expected: dest_len,
            });
        }

        Ok(Self {
            spans,
            source_len,
            dest_len,
        })
    }

    pub fn spans(&self) -> &[EditSpan] {
        &self.spans
    }

    /// Number of lines in the old text
    pub fn source_len(&self) -> usize {
        self.source_len
    }

    /// Number of lines in the new text
    pub fn dest_len(&self) -> usize {
        self.dest_len
    }

    /// True when no span records a change
    pub fn is_identity(&self) -> bool {
        self.spans.iter().all(|s| !s.status.is_change())
    }

    /// Spans that differ from the old text, in order
    pub fn changed_spans(&self) -> impl Iterator<Item = &EditSpan> {
        self.spans.iter().filter(|s| s.status.is_change())
    }
}
