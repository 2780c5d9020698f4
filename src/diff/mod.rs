//! Line diffing for issue anchoring.
//!
//! This module contains:
//! - Lines: separator detection and line splitting
//! - Script: EditSpan / EditScript with partition validation
//! - Engine: the DiffEngine seam and the default Myers implementation

pub mod engine;
pub mod lines;
pub mod script;

// Re-export commonly used types
pub use engine::{diff_lines, diff_texts, DiffEngine, LineDiffEngine, Precision, DEFAULT_FAST_DEADLINE};
pub use lines::{detect_separator, split_lines, LineSeparator};
pub use script::{EditScript, EditSpan, ScriptError, SpanStatus};
