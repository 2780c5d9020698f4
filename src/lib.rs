//! issue-anchor - Keep analysis issues anchored while text changes
//!
//! Issues reported by an analysis server point at lines of the snapshot
//! that was analyzed. Once the local text diverges from that snapshot,
//! those line numbers drift. This crate diffs the two texts line by line
//! and uses the edit script to move issues onto the current text, dropping
//! issues whose line was edited away.
//!
//! # Modules
//!
//! - `diff`: Line splitting, edit scripts, the diff engine seam
//! - `core`: Translation and remapping (Translator, IssueRemapper)
//! - `domain`: Data structures (Issue, IssueStatus, ComponentFilter)
//! - `config`: Layered configuration
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Move server issues onto the working copy
//! issue-anchor remap --reference base.rs --current src/lib.rs --issues issues.json
//!
//! # Flag local issues that sit in edited regions
//! issue-anchor changed --reference base.rs --current src/lib.rs --issues local.json
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod diff;
pub mod domain;

// Re-export main types at crate root for convenience
pub use self::core::{select_issues_in_changed_regions, translate, IssueRemapper, RemapError, RemapReport};
pub use diff::{DiffEngine, EditScript, EditSpan, LineDiffEngine, Precision, ScriptError, SpanStatus};
pub use domain::{ComponentFilter, Issue, IssueStatus};
