//! Issue remapping between snapshots.
//!
//! Two entry points share one edit script type:
//! - forward remap: issues anchored on the analyzed snapshot are moved to
//!   the current text, dropping those whose line was edited away
//! - changed-region selection: issues already in current coordinates are
//!   checked against the spans that differ from the analyzed snapshot

use thiserror::Error;
use tracing::{debug, info};

use crate::diff::{diff_texts, DiffEngine, EditScript, LineDiffEngine, Precision, ScriptError, SpanStatus};
use crate::domain::{default_relevant_statuses, Issue, IssueStatus};

use super::translator::translate;

/// Errors surfaced by remap operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemapError {
    #[error("Malformed edit script: {0}")]
    MalformedScript(#[from] ScriptError),
}

/// Outcome of a forward remap with bookkeeping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemapReport {
    /// Remapped copies, ascending by line
    pub issues: Vec<Issue>,
    /// Keys of relevant issues whose anchor no longer exists
    pub dropped: Vec<String>,
    /// Issues skipped because their status is not re-anchored
    pub skipped_status: usize,
    /// Issues skipped by the component filter
    pub skipped_component: usize,
}

/// Moves issues between the analyzed snapshot and the current text
#[derive(Debug, Clone)]
pub struct IssueRemapper<E: DiffEngine = LineDiffEngine> {
    engine: E,
    relevant_statuses: Vec<IssueStatus>,
}

impl Default for IssueRemapper<LineDiffEngine> {
    fn default() -> Self {
        Self::new()
    }
}

impl IssueRemapper<LineDiffEngine> {
    /// Remapper using the default diff engine
    pub fn new() -> Self {
        Self::with_engine(LineDiffEngine::default())
    }
}

impl<E: DiffEngine> IssueRemapper<E> {
    pub fn with_engine(engine: E) -> Self {
        Self {
            engine,
            relevant_statuses: default_relevant_statuses(),
        }
    }

    /// Replace the set of statuses that get re-anchored
    pub fn with_relevant_statuses(mut self, statuses: Vec<IssueStatus>) -> Self {
        self.relevant_statuses = statuses;
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn relevant_statuses(&self) -> &[IssueStatus] {
        &self.relevant_statuses
    }

    /// Remap `issues` from `reference` coordinates to `current` coordinates
    ///
    /// Only issues accepted by `component_filter` and carrying a relevant
    /// status are considered. Issues whose line cannot be translated are
    /// dropped. The result is sorted ascending by line.
    pub fn remap_to_current<F>(
        &self,
        issues: &[Issue],
        reference: &str,
        current: &str,
        component_filter: F,
    ) -> Result<Vec<Issue>, RemapError>
    where
        F: Fn(&Issue) -> bool,
    {
        Ok(self
            .remap_with_report(issues, reference, current, component_filter)?
            .issues)
    }

    /// Same as [`remap_to_current`](Self::remap_to_current), also reporting
    /// what was dropped or skipped
    pub fn remap_with_report<F>(
        &self,
        issues: &[Issue],
        reference: &str,
        current: &str,
        component_filter: F,
    ) -> Result<RemapReport, RemapError>
    where
        F: Fn(&Issue) -> bool,
    {
        let mut report = RemapReport::default();
        // Nothing to anchor, so the texts are not diffed
        if issues.is_empty() {
            return Ok(report);
        }

        let script = diff_texts(&self.engine, reference, current, Precision::Fast)?;

        for issue in issues {
            if !component_filter(issue) {
                report.skipped_component += 1;
                continue;
            }
            if !self.relevant_statuses.contains(&issue.status) {
                debug!(key = %issue.key, status = %issue.status, "Skipping issue with irrelevant status");
                report.skipped_status += 1;
                continue;
            }

            match issue.line.and_then(|line| translate(line, &script)) {
                Some(line) => report.issues.push(issue.with_line(line)),
                None => {
                    debug!(key = %issue.key, line = ?issue.line, "Issue anchor lost, dropping");
                    report.dropped.push(issue.key.clone());
                }
            }
        }

        report.issues.sort_by_key(|issue| issue.line);

        info!(
            kept = report.issues.len(),
            dropped = report.dropped.len(),
            skipped_status = report.skipped_status,
            skipped_component = report.skipped_component,
            "Remapped issues to current text"
        );
        Ok(report)
    }

    /// Diff both texts and select the issues (in `current` coordinates)
    /// that sit in changed regions
    pub fn select_changed_between<'a>(
        &self,
        issues: &'a [Issue],
        reference: &str,
        current: &str,
    ) -> Result<Vec<&'a Issue>, RemapError> {
        if issues.is_empty() {
            return Ok(Vec::new());
        }
        let script = diff_texts(&self.engine, reference, current, Precision::Fast)?;
        Ok(select_issues_in_changed_regions(issues, &script))
    }
}

/// Select issues, given in new-text coordinates, that lie in changed spans
///
/// An inserted span selects every issue on any of its lines. A replaced span
/// only selects issues on its first destination line, matching a one-to-one
/// single line replace; the rest of a multi-line replacement is not selected.
/// This is narrower than [`translate`], which rejects a replaced span over its
/// whole range. Kept as is pending a product decision.
pub fn select_issues_in_changed_regions<'a>(
    issues: &'a [Issue],
    script: &EditScript,
) -> Vec<&'a Issue> {
    let mut selected = Vec::new();

    for span in script.spans() {
        for issue in issues {
            let Some(index) = issue.line.and_then(|line| line.checked_sub(1)) else {
                continue;
            };

            let hit = match span.status {
                SpanStatus::Replaced => index == span.dest_index,
                SpanStatus::Inserted => span.contains_dest(index),
                SpanStatus::Unchanged | SpanStatus::Deleted => false,
            };
            if hit {
                selected.push(issue);
            }
        }
    }

    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::EditSpan;

    fn issue(key: &str, line: usize) -> Issue {
        Issue::new(key, "rust:S1", "proj:src/lib.rs", Some(line), IssueStatus::Open)
    }

    #[test]
    fn test_replaced_selects_only_first_dest_line() {
        // a b c -> a x y z c
        let script = EditScript::new(
            vec![
                EditSpan::unchanged(0, 0, 1),
                EditSpan::replaced(1, 1, 1, 3),
                EditSpan::unchanged(2, 4, 1),
            ],
            3,
            5,
        )
        .unwrap();
        let issues = vec![issue("a", 1), issue("x", 2), issue("y", 3), issue("z", 4), issue("c", 5)];

        let keys: Vec<_> = select_issues_in_changed_regions(&issues, &script)
            .into_iter()
            .map(|i| i.key.as_str())
            .collect();
        assert_eq!(keys, vec!["x"]);
    }

    #[test]
    fn test_deleted_selects_nothing() {
        let script = EditScript::new(
            vec![EditSpan::unchanged(0, 0, 1), EditSpan::deleted(1, 2, 1)],
            3,
            1,
        )
        .unwrap();
        let issues = vec![issue("a", 1), issue("b", 2)];
        assert!(select_issues_in_changed_regions(&issues, &script).is_empty());
    }

    #[test]
    fn test_file_level_issues_ignored() {
        let script = EditScript::new(vec![EditSpan::inserted(0, 0, 2)], 0, 2).unwrap();
        let mut file_level = issue("f", 1);
        file_level.line = None;
        let issues = vec![file_level, issue("i", 2)];

        let selected = select_issues_in_changed_regions(&issues, &script);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].key, "i");
    }

    #[test]
    fn test_empty_input_short_circuits() {
        let remapper = IssueRemapper::new();
        let remapped = remapper.remap_to_current(&[], "a", "b", |_| true).unwrap();
        assert!(remapped.is_empty());

        let selected = remapper.select_changed_between(&[], "a", "b").unwrap();
        assert!(selected.is_empty());
    }

    #[test]
    fn test_report_counts() {
        let remapper = IssueRemapper::new();
        let mut closed = issue("closed", 1);
        closed.status = IssueStatus::Closed;
        let mut elsewhere = issue("elsewhere", 1);
        elsewhere.component = "proj:src/main.rs".to_string();
        let issues = vec![issue("kept", 1), issue("lost", 2), closed, elsewhere];

        let report = remapper
            .remap_with_report(&issues, "a\nb", "a\nB", |i| i.component == "proj:src/lib.rs")
            .unwrap();

        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].key, "kept");
        assert_eq!(report.dropped, vec!["lost".to_string()]);
        assert_eq!(report.skipped_status, 1);
        assert_eq!(report.skipped_component, 1);
    }
}
