//! Issue position tracking.
//!
//! This module contains:
//! - Translator: old-line to new-line translation over an edit script
//! - Remapper: forward remap and changed-region selection over issue sets

pub mod remapper;
pub mod translator;

// Re-export commonly used types
pub use remapper::{select_issues_in_changed_regions, IssueRemapper, RemapError, RemapReport};
pub use translator::{find_span, translate};
