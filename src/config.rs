//! Configuration for issue remapping.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (ISSUE_ANCHOR_FAST_DEADLINE_MS)
//! 2. Project config file (.issue-anchor/config.yaml)
//! 3. User config file (~/.issue-anchor/config.yaml)
//! 4. Defaults
//!
//! Config file discovery:
//! - Searches current directory and parents for .issue-anchor/config.yaml
//! - Falls back to the home directory

use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::core::IssueRemapper;
use crate::diff::{LineDiffEngine, DEFAULT_FAST_DEADLINE};
use crate::domain::{default_relevant_statuses, IssueStatus};

const CONFIG_DIR: &str = ".issue-anchor";
const CONFIG_FILE: &str = "config.yaml";
const FAST_DEADLINE_ENV: &str = "ISSUE_ANCHOR_FAST_DEADLINE_MS";

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub diff: DiffConfig,
    #[serde(default)]
    pub issues: IssuesConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiffConfig {
    /// Time budget for fast diffs, in milliseconds
    pub fast_deadline_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssuesConfig {
    /// Statuses that get re-anchored
    pub relevant_statuses: Option<Vec<IssueStatus>>,
}

/// Resolved configuration
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    /// Deadline for fast diffs
    pub fast_deadline: Duration,
    /// Statuses that get re-anchored
    pub relevant_statuses: Vec<IssueStatus>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            fast_deadline: DEFAULT_FAST_DEADLINE,
            relevant_statuses: default_relevant_statuses(),
        }
    }
}

impl ResolvedConfig {
    /// Build a remapper with these settings
    pub fn remapper(&self) -> IssueRemapper<LineDiffEngine> {
        IssueRemapper::with_engine(LineDiffEngine::new(self.fast_deadline))
            .with_relevant_statuses(self.relevant_statuses.clone())
    }
}

/// Find a project config file by searching `start` and its parents
fn find_project_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_DIR).join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Find the config file: project first, then user-level
fn find_config_file() -> Option<PathBuf> {
    let project = std::env::current_dir()
        .ok()
        .and_then(|cwd| find_project_config(&cwd));

    project.or_else(|| {
        let user = dirs::home_dir()?.join(CONFIG_DIR).join(CONFIG_FILE);
        user.exists().then_some(user)
    })
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Merge a parsed file and an optional env override over the defaults
fn resolve(
    config_file: Option<PathBuf>,
    file: Option<ConfigFile>,
    env_deadline: Option<String>,
) -> Result<ResolvedConfig> {
    let mut resolved = ResolvedConfig {
        config_file,
        ..Default::default()
    };

    if let Some(file) = file {
        if let Some(ms) = file.diff.fast_deadline_ms {
            resolved.fast_deadline = Duration::from_millis(ms);
        }
        if let Some(statuses) = file.issues.relevant_statuses {
            resolved.relevant_statuses = statuses;
        }
    }

    if let Some(raw) = env_deadline {
        let ms: u64 = raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {}: {}", FAST_DEADLINE_ENV, raw))?;
        resolved.fast_deadline = Duration::from_millis(ms);
    }

    Ok(resolved)
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let config_file = find_config_file();
    let file = match config_file {
        Some(ref path) => Some(load_config_file(path)?),
        None => None,
    };
    let env_deadline = std::env::var(FAST_DEADLINE_ENV).ok();

    resolve(config_file, file, env_deadline)
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(dir: &Path, body: &str) -> PathBuf {
        let config_dir = dir.join(CONFIG_DIR);
        std::fs::create_dir_all(&config_dir).unwrap();
        let config_path = config_dir.join(CONFIG_FILE);
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "{}", body).unwrap();
        config_path
    }

    #[test]
    fn test_defaults() {
        let config = resolve(None, None, None).unwrap();
        assert!(config.config_file.is_none());
        assert_eq!(config.fast_deadline, DEFAULT_FAST_DEADLINE);
        assert_eq!(
            config.relevant_statuses,
            vec![IssueStatus::Open, IssueStatus::Reopened]
        );
    }

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let config_path = write_config(
            temp.path(),
            r#"
version: "1.0"
diff:
  fast_deadline_ms: 20
issues:
  relevant_statuses: [OPEN, CONFIRMED, REOPENED]
"#,
        );

        let file = load_config_file(&config_path).unwrap();
        assert_eq!(file.version, "1.0");
        assert_eq!(file.diff.fast_deadline_ms, Some(20));

        let config = resolve(Some(config_path.clone()), Some(file), None).unwrap();
        assert_eq!(config.config_file, Some(config_path));
        assert_eq!(config.fast_deadline, Duration::from_millis(20));
        assert_eq!(config.relevant_statuses.len(), 3);
        assert!(config.relevant_statuses.contains(&IssueStatus::Confirmed));
    }

    #[test]
    fn test_sections_optional() {
        let temp = TempDir::new().unwrap();
        let config_path = write_config(temp.path(), "version: \"1.0\"");

        let file = load_config_file(&config_path).unwrap();
        let config = resolve(None, Some(file), None).unwrap();
        assert_eq!(config.fast_deadline, DEFAULT_FAST_DEADLINE);
    }

    #[test]
    fn test_env_overrides_file() {
        let file: ConfigFile =
            serde_yaml::from_str("version: \"1.0\"\ndiff:\n  fast_deadline_ms: 20\n").unwrap();
        let config = resolve(None, Some(file), Some("5".to_string())).unwrap();
        assert_eq!(config.fast_deadline, Duration::from_millis(5));

        assert!(resolve(None, None, Some("soon".to_string())).is_err());
    }

    #[test]
    fn test_project_config_found_from_subdirectory() {
        let temp = TempDir::new().unwrap();
        let config_path = write_config(temp.path(), "version: \"1.0\"");
        let nested = temp.path().join("src").join("core");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_project_config(&nested), Some(config_path));
    }

    #[test]
    fn test_remapper_uses_settings() {
        let config = ResolvedConfig {
            config_file: None,
            fast_deadline: Duration::from_millis(7),
            relevant_statuses: vec![IssueStatus::Confirmed],
        };
        let remapper = config.remapper();
        assert_eq!(remapper.engine().fast_deadline(), Duration::from_millis(7));
        assert_eq!(remapper.relevant_statuses(), &[IssueStatus::Confirmed]);
    }
}
