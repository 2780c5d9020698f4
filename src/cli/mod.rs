//! Command-line interface for issue-anchor.
//!
//! Provides commands for remapping server issues onto local text,
//! flagging issues in changed regions, showing the line diff, and
//! inspecting the resolved configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::config;
use crate::diff::{diff_texts, Precision};
use crate::domain::{ComponentFilter, Issue};

/// issue-anchor - Keep analysis issues on the right line while text changes
#[derive(Parser, Debug)]
#[command(name = "issue-anchor")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Move issues from the analyzed snapshot onto the current text
    Remap {
        /// Snapshot the issues were computed on
        #[arg(short, long)]
        reference: PathBuf,

        /// Current text
        #[arg(short, long)]
        current: PathBuf,

        /// Issues as a JSON array
        #[arg(short, long)]
        issues: PathBuf,

        /// Only remap issues whose component matches this glob
        #[arg(long)]
        component: Option<String>,
    },

    /// List issues (in current-text lines) that sit in changed regions
    Changed {
        /// Snapshot of the last server analysis
        #[arg(short, long)]
        reference: PathBuf,

        /// Current text
        #[arg(short, long)]
        current: PathBuf,

        /// Issues as a JSON array, lines relative to the current text
        #[arg(short, long)]
        issues: PathBuf,
    },

    /// Show the exact line diff between two files
    Diff {
        /// Old text
        #[arg(short, long)]
        reference: PathBuf,

        /// New text
        #[arg(short, long)]
        current: PathBuf,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Remap {
                reference,
                current,
                issues,
                component,
            } => remap(&reference, &current, &issues, component.as_deref()),
            Commands::Changed {
                reference,
                current,
                issues,
            } => changed(&reference, &current, &issues),
            Commands::Diff { reference, current } => show_diff(&reference, &current),
            Commands::Config => show_config(),
        }
    }
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))
}

/// Load an issue list from a JSON file
pub fn load_issues(path: &Path) -> Result<Vec<Issue>> {
    let content = read_text(path)?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse issues: {}", path.display()))
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", out);
    Ok(())
}

/// Forward remap
fn remap(reference: &Path, current: &Path, issues: &Path, component: Option<&str>) -> Result<()> {
    let filter = match component {
        Some(pattern) => ComponentFilter::glob(pattern)
            .with_context(|| format!("Invalid component pattern: {}", pattern))?,
        None => ComponentFilter::Any,
    };

    let remapper = config::config()?.remapper();
    let report = remapper.remap_with_report(
        &load_issues(issues)?,
        &read_text(reference)?,
        &read_text(current)?,
        |issue| filter.matches(issue),
    )?;

    print_json(&report.issues)?;
    eprintln!(
        "\n[{} remapped, {} dropped, {} skipped by status, {} skipped by component]",
        report.issues.len(),
        report.dropped.len(),
        report.skipped_status,
        report.skipped_component
    );
    for key in &report.dropped {
        eprintln!("  dropped: {}", key);
    }

    Ok(())
}

/// Changed-region selection
fn changed(reference: &Path, current: &Path, issues: &Path) -> Result<()> {
    let issues = load_issues(issues)?;
    let remapper = config::config()?.remapper();
    let selected =
        remapper.select_changed_between(&issues, &read_text(reference)?, &read_text(current)?)?;

    print_json(&selected)?;
    eprintln!("\n[{} of {} issues in changed regions]", selected.len(), issues.len());
    Ok(())
}

/// One-off exact diff
fn show_diff(reference: &Path, current: &Path) -> Result<()> {
    let engine = config::config()?.remapper().engine().clone();
    let script = diff_texts(
        &engine,
        &read_text(reference)?,
        &read_text(current)?,
        Precision::Exact,
    )?;

    println!("{} -> {} lines", script.source_len(), script.dest_len());
    for span in script.spans() {
        // 1-based, inclusive-exclusive ranges
        println!(
            "  {:<10} old {:>5}..{:<5} new {:>5}..{:<5}",
            span.status,
            span.source_index + 1,
            span.source_index + span.source_length + 1,
            span.dest_index + 1,
            span.dest_index + span.dest_length + 1,
        );
    }

    Ok(())
}

fn show_config() -> Result<()> {
    let cfg = config::config()?;

    println!("issue-anchor configuration");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Diff:");
    println!("  Fast deadline: {}ms", cfg.fast_deadline.as_millis());
    println!();
    println!("Re-anchored statuses:");
    for status in &cfg.relevant_statuses {
        println!("  {}", status);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_remap_args() {
        let cli = Cli::try_parse_from([
            "issue-anchor",
            "remap",
            "--reference",
            "old.rs",
            "--current",
            "new.rs",
            "--issues",
            "issues.json",
            "--component",
            "proj:src/*.rs",
        ])
        .unwrap();

        match cli.command {
            Commands::Remap { component, .. } => {
                assert_eq!(component.as_deref(), Some("proj:src/*.rs"));
            }
            other => panic!("Expected Remap, got {:?}", other),
        }
    }

    #[test]
    fn test_load_issues() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("issues.json");
        std::fs::write(
            &path,
            r#"[{"key":"k1","rule":"r","component":"c","line":4,"status":"OPEN"}]"#,
        )
        .unwrap();

        let issues = load_issues(&path).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, Some(4));

        std::fs::write(&path, "not json").unwrap();
        assert!(load_issues(&path).is_err());
    }
}
