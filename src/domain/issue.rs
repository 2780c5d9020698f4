//! Issue types as served by the analysis server
//!
//! These mirror the JSON shape of the server's issue search results,
//! restricted to the fields the tracker reads or passes through.

use std::fmt;

use glob::Pattern;
use serde::{Deserialize, Serialize};

/// Lifecycle status of an issue on the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueStatus {
    Open,
    Confirmed,
    Reopened,
    Resolved,
    Closed,
    /// Any status this crate does not classify (e.g. TO_REVIEW)
    #[serde(other)]
    Other,
}

impl IssueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueStatus::Open => "OPEN",
            IssueStatus::Confirmed => "CONFIRMED",
            IssueStatus::Reopened => "REOPENED",
            IssueStatus::Resolved => "RESOLVED",
            IssueStatus::Closed => "CLOSED",
            IssueStatus::Other => "OTHER",
        }
    }

    /// Whether the issue still needs attention
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            IssueStatus::Open | IssueStatus::Confirmed | IssueStatus::Reopened
        )
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Statuses that get re-anchored by default
pub fn default_relevant_statuses() -> Vec<IssueStatus> {
    vec![IssueStatus::Open, IssueStatus::Reopened]
}

/// A finding tied to a line of one snapshot of a component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Server-side issue key
    pub key: String,
    /// Rule that raised the issue (e.g. "rust:S1481")
    pub rule: String,
    /// Component (file) key the issue belongs to
    pub component: String,
    /// 1-based line; absent for file-level issues
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    pub status: IssueStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
}

impl Issue {
    pub fn new(
        key: impl Into<String>,
        rule: impl Into<String>,
        component: impl Into<String>,
        line: Option<usize>,
        status: IssueStatus,
    ) -> Self {
        Self {
            key: key.into(),
            rule: rule.into(),
            component: component.into(),
            line,
            status,
            message: None,
            severity: None,
        }
    }

    /// Copy of this issue anchored at `line`
    pub fn with_line(&self, line: usize) -> Self {
        Self {
            line: Some(line),
            ..self.clone()
        }
    }
}

/// Which components an operation applies to
#[derive(Debug, Clone, Default)]
pub enum ComponentFilter {
    #[default]
    Any,
    /// Component key must match exactly
    Exact(String),
    /// Component key must match a glob pattern
    Glob(Pattern),
}

impl ComponentFilter {
    /// Build a glob filter, rejecting invalid patterns
    pub fn glob(pattern: &str) -> Result<Self, glob::PatternError> {
        Ok(ComponentFilter::Glob(Pattern::new(pattern)?))
    }

    pub fn matches(&self, issue: &Issue) -> bool {
        match self {
            ComponentFilter::Any => true,
            ComponentFilter::Exact(component) => issue.component == *component,
            ComponentFilter::Glob(pattern) => pattern.matches(&issue.component),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_json_shape() {
        let json = r#"{
            "key": "AX-1",
            "rule": "rust:S1481",
            "component": "proj:src/lib.rs",
            "line": 12,
            "status": "REOPENED",
            "message": "Remove this unused variable"
        }"#;

        let issue: Issue = serde_json::from_str(json).unwrap();
        assert_eq!(issue.key, "AX-1");
        assert_eq!(issue.line, Some(12));
        assert_eq!(issue.status, IssueStatus::Reopened);
        assert!(issue.severity.is_none());

        let back = serde_json::to_value(&issue).unwrap();
        assert_eq!(back["status"], "REOPENED");
        assert!(back.get("severity").is_none());
    }

    #[test]
    fn test_file_level_issue_has_no_line() {
        let json = r#"{"key":"k","rule":"r","component":"c","status":"OPEN"}"#;
        let issue: Issue = serde_json::from_str(json).unwrap();
        assert_eq!(issue.line, None);
    }

    #[test]
    fn test_unknown_status_still_loads() {
        let json = r#"[
            {"key":"k1","rule":"r","component":"c","line":1,"status":"TO_REVIEW"},
            {"key":"k2","rule":"r","component":"c","line":2,"status":"OPEN"}
        ]"#;
        let issues: Vec<Issue> = serde_json::from_str(json).unwrap();
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].status, IssueStatus::Other);
        assert!(!issues[0].status.is_open());
        assert!(!default_relevant_statuses().contains(&IssueStatus::Other));
    }

    #[test]
    fn test_status_classification() {
        assert!(IssueStatus::Open.is_open());
        assert!(IssueStatus::Confirmed.is_open());
        assert!(!IssueStatus::Resolved.is_open());
        assert!(!IssueStatus::Closed.is_open());
        assert_eq!(
            default_relevant_statuses(),
            vec![IssueStatus::Open, IssueStatus::Reopened]
        );
    }

    #[test]
    fn test_with_line_copies() {
        let issue = Issue::new("k", "r", "c", Some(3), IssueStatus::Open);
        let moved = issue.with_line(7);
        assert_eq!(moved.line, Some(7));
        assert_eq!(issue.line, Some(3));
        assert_eq!(moved.key, issue.key);
    }

    #[test]
    fn test_component_filter() {
        let issue = Issue::new("k", "r", "proj:src/core/mod.rs", Some(1), IssueStatus::Open);

        assert!(ComponentFilter::Any.matches(&issue));
        assert!(ComponentFilter::Exact("proj:src/core/mod.rs".to_string()).matches(&issue));
        assert!(!ComponentFilter::Exact("proj:src/lib.rs".to_string()).matches(&issue));
        assert!(ComponentFilter::glob("proj:src/**/*.rs").unwrap().matches(&issue));
        assert!(!ComponentFilter::glob("other:*").unwrap().matches(&issue));
        assert!(ComponentFilter::glob("[").is_err());
    }
}
