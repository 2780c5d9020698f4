//! Domain types for issue anchoring.
//!
//! This module contains:
//! - Issue: a server finding anchored to a line of one snapshot

pub mod issue;

// Re-export commonly used types
pub use issue::{default_relevant_statuses, ComponentFilter, Issue, IssueStatus};
