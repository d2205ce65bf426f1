//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! rangelog has two configuration scopes:
//! - **Global**: User-level settings
//! - **Repo**: Repository-level overrides
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Repo config file
//! 4. `RANGELOG_GIT` environment variable (comparison program only)
//! 5. CLI flags (not handled here)
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$RANGELOG_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/rangelog/config.toml`
//! 3. `~/.rangelog/config.toml`
//!
//! # Repo Config Locations
//!
//! Searched in order:
//! 1. `<git dir>/rangelog/config.toml` (canonical; `.git/rangelog/config.toml`
//!    for a normal checkout, `rangelog/config.toml` inside a bare repository)
//! 2. `.rangelog.toml` (work tree root, warns; skipped for bare repositories)
//!
//! # Example
//!
//! ```no_run
//! use rangelog::core::config::{Config, RepoDirs};
//! use std::path::Path;
//!
//! let dirs = RepoDirs::work_tree(Path::new("/path/to/repo"));
//! let result = Config::load(Some(&dirs)).unwrap();
//! let config = result.config;
//!
//! println!("Comparison tool: {}", config.comparison_program());
//! println!("Ignored commits: {}", config.ignored_commits().len());
//! ```

pub mod schema;

pub use schema::{ComparisonConfig, GlobalConfig, IgnoreConfig, RepoConfig};

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::debug;
use thiserror::Error;

use crate::core::types::{IgnoreSet, SingleCommitPolicy};

/// Environment variable naming the global config file.
pub const CONFIG_ENV: &str = "RANGELOG_CONFIG";

/// Environment variable overriding the comparison program.
pub const GIT_PROGRAM_ENV: &str = "RANGELOG_GIT";

/// Default comparison program, looked up through `PATH`.
pub const DEFAULT_COMPARISON_PROGRAM: &str = "git";

/// Default comparison timeout.
pub const DEFAULT_COMPARISON_TIMEOUT_SECS: u64 = 120;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Warnings generated during config loading.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
    /// The path that triggered the warning.
    pub path: PathBuf,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Any warnings generated during loading.
    pub warnings: Vec<ConfigWarning>,
}

/// Merged configuration from all sources.
///
/// Accessor methods apply precedence rules automatically. Repo config
/// overrides global config.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration
    pub global: GlobalConfig,
    /// Repository configuration (if in a repo)
    pub repo: Option<RepoConfig>,
    /// Path to the global config file (if loaded)
    pub(crate) global_path: Option<PathBuf>,
    /// Path to the repo config file (if loaded)
    pub(crate) repo_path: Option<PathBuf>,
}

/// Where a repository keeps its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoDirs {
    /// The git directory (`.git`, or the repository itself when bare)
    pub git_dir: PathBuf,
    /// The work tree, if the repository has one
    pub work_tree: Option<PathBuf>,
}

impl RepoDirs {
    /// A normal checkout whose git directory is `<path>/.git`.
    pub fn work_tree(path: &Path) -> Self {
        Self {
            git_dir: path.join(".git"),
            work_tree: Some(path.to_path_buf()),
        }
    }

    /// A bare repository.
    pub fn bare(git_dir: &Path) -> Self {
        Self {
            git_dir: git_dir.to_path_buf(),
            work_tree: None,
        }
    }
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// If `repo` is provided, also loads repo-specific config.
    ///
    /// # Errors
    ///
    /// Returns an error if config files exist but cannot be parsed.
    /// Missing config files are not an error (defaults are used).
    pub fn load(repo: Option<&RepoDirs>) -> Result<ConfigLoadResult, ConfigError> {
        let mut warnings = Vec::new();

        let (global, global_path) = Self::load_global()?;

        let (repo, repo_path_found) = if let Some(dirs) = repo {
            Self::load_repo(dirs, &mut warnings)?
        } else {
            (None, None)
        };

        global.validate()?;
        if let Some(ref r) = repo {
            r.validate()?;
        }

        debug!(
            "config loaded (global: {:?}, repo: {:?})",
            global_path, repo_path_found
        );

        Ok(ConfigLoadResult {
            config: Config {
                global,
                repo,
                global_path,
                repo_path: repo_path_found,
            },
            warnings,
        })
    }

    /// Load global configuration from standard locations.
    fn load_global() -> Result<(GlobalConfig, Option<PathBuf>), ConfigError> {
        // 1. Check $RANGELOG_CONFIG
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                let config = Self::read_config(&path)?;
                return Ok((config, Some(path)));
            }
        }

        // 2. Check $XDG_CONFIG_HOME/rangelog/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("rangelog/config.toml");
            if path.exists() {
                let config = Self::read_config(&path)?;
                return Ok((config, Some(path)));
            }
        }

        // 3. Check ~/.rangelog/config.toml
        if let Some(home) = dirs::home_dir() {
            let path = home.join(".rangelog/config.toml");
            if path.exists() {
                let config = Self::read_config(&path)?;
                return Ok((config, Some(path)));
            }
        }

        Ok((GlobalConfig::default(), None))
    }

    /// Load repository configuration from standard locations.
    fn load_repo(
        dirs: &RepoDirs,
        warnings: &mut Vec<ConfigWarning>,
    ) -> Result<(Option<RepoConfig>, Option<PathBuf>), ConfigError> {
        // 1. Check <git dir>/rangelog/config.toml (canonical)
        let canonical = Self::repo_config_path(dirs);
        if canonical.exists() {
            let config = Self::read_config(&canonical)?;
            return Ok((Some(config), Some(canonical)));
        }

        // 2. Check .rangelog.toml in the work tree
        let Some(work_tree) = &dirs.work_tree else {
            return Ok((None, None));
        };
        let in_tree = work_tree.join(".rangelog.toml");
        if in_tree.exists() {
            warnings.push(ConfigWarning {
                message: format!(
                    "Using in-tree config. Consider moving it to '{}'",
                    canonical.display()
                ),
                path: in_tree.clone(),
            });
            let config = Self::read_config(&in_tree)?;
            return Ok((Some(config), Some(in_tree)));
        }

        Ok((None, None))
    }

    /// Read and parse a config file of either scope.
    fn read_config<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Get the canonical path for repo config: `<git dir>/rangelog/config.toml`.
    pub fn repo_config_path(dirs: &RepoDirs) -> PathBuf {
        dirs.git_dir.join("rangelog/config.toml")
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    fn comparison_setting<T>(&self, pick: impl Fn(&ComparisonConfig) -> Option<T>) -> Option<T> {
        self.repo
            .as_ref()
            .and_then(|r| r.comparison.as_ref())
            .and_then(&pick)
            .or_else(|| self.global.comparison.as_ref().and_then(&pick))
    }

    /// Get the patch-comparison program.
    ///
    /// `$RANGELOG_GIT` wins over config files. Defaults to `git`.
    pub fn comparison_program(&self) -> String {
        if let Ok(program) = std::env::var(GIT_PROGRAM_ENV) {
            if !program.trim().is_empty() {
                return program;
            }
        }
        self.comparison_setting(|c| c.program.clone())
            .unwrap_or_else(|| DEFAULT_COMPARISON_PROGRAM.to_string())
    }

    /// Get the patch-comparison timeout.
    ///
    /// Returns `None` when configured as 0 (no timeout).
    pub fn comparison_timeout(&self) -> Option<Duration> {
        let secs = self
            .comparison_setting(|c| c.timeout_secs)
            .unwrap_or(DEFAULT_COMPARISON_TIMEOUT_SECS);
        (secs > 0).then(|| Duration::from_secs(secs))
    }

    /// Get the configured ignore set (global and repo lists combined).
    pub fn ignored_commits(&self) -> IgnoreSet {
        let global = self.global.ignore.iter().flat_map(|i| i.commits.iter());
        let repo = self
            .repo
            .iter()
            .flat_map(|r| r.ignore.iter())
            .flat_map(|i| i.commits.iter());
        global.chain(repo).cloned().collect()
    }

    /// Get the single-commit ignore policy.
    ///
    /// Defaults to [`SingleCommitPolicy::Bypass`].
    pub fn single_commit_policy(&self) -> SingleCommitPolicy {
        let pick = |i: &IgnoreConfig| i.single_commit;
        self.repo
            .as_ref()
            .and_then(|r| r.ignore.as_ref())
            .and_then(pick)
            .or_else(|| self.global.ignore.as_ref().and_then(pick))
            .unwrap_or_default()
    }

    /// Get the path to the loaded global config file.
    pub fn global_config_loaded_from(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    /// Get the path to the loaded repo config file.
    pub fn repo_config_loaded_from(&self) -> Option<&Path> {
        self.repo_path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_without_files() {
        let config = Config::default();

        assert_eq!(
            config.comparison_timeout(),
            Some(Duration::from_secs(DEFAULT_COMPARISON_TIMEOUT_SECS))
        );
        assert!(config.ignored_commits().is_empty());
        assert_eq!(config.single_commit_policy(), SingleCommitPolicy::Bypass);
        assert!(config.global_config_loaded_from().is_none());
        assert!(config.repo_config_loaded_from().is_none());
    }

    #[test]
    fn load_repo_config() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(".git/rangelog");
        fs::create_dir_all(&dir).unwrap();

        fs::write(
            dir.join("config.toml"),
            r#"
            [ignore]
            commits = ["abc123"]
            single_commit = "apply"
            "#,
        )
        .unwrap();

        let result = Config::load(Some(&RepoDirs::work_tree(temp.path()))).unwrap();
        let config = result.config;

        assert!(config.ignored_commits().contains("abc123"));
        assert_eq!(config.single_commit_policy(), SingleCommitPolicy::Apply);
        assert!(config.repo_config_loaded_from().is_some());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn in_tree_config_warns() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(".rangelog.toml"),
            "[ignore]\ncommits = [\"def456\"]\n",
        )
        .unwrap();

        let result = Config::load(Some(&RepoDirs::work_tree(temp.path()))).unwrap();

        assert!(result.config.ignored_commits().contains("def456"));
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].message.contains("in-tree"));
    }

    #[test]
    fn bare_repo_config_lives_in_git_dir() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("rangelog");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.toml"), "[ignore]\ncommits = [\"bare1\"]\n").unwrap();
        // An in-tree file means nothing without a work tree
        fs::write(temp.path().join(".rangelog.toml"), "[ignore\n").unwrap();

        let dirs = RepoDirs::bare(temp.path());
        assert_eq!(Config::repo_config_path(&dirs), dir.join("config.toml"));

        let result = Config::load(Some(&dirs)).unwrap();
        assert!(result.config.ignored_commits().contains("bare1"));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn bare_repo_without_config() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".rangelog.toml"), "[ignore\n").unwrap();

        let result = Config::load(Some(&RepoDirs::bare(temp.path()))).unwrap();
        assert!(result.config.repo_config_loaded_from().is_none());
    }

    #[test]
    fn unknown_fields_rejected() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(".rangelog.toml"),
            r#"
            unknown_field = true
            "#,
        )
        .unwrap();

        let result = Config::load(Some(&RepoDirs::work_tree(temp.path())));
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn zero_timeout_disables() {
        let config = Config {
            global: GlobalConfig {
                comparison: Some(ComparisonConfig {
                    program: None,
                    timeout_secs: Some(0),
                }),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(config.comparison_timeout(), None);
    }

    #[test]
    fn precedence_repo_overrides_global() {
        let config = Config {
            global: GlobalConfig {
                comparison: Some(ComparisonConfig {
                    program: None,
                    timeout_secs: Some(10),
                }),
                ignore: Some(IgnoreConfig {
                    commits: vec!["global".into()],
                    single_commit: Some(SingleCommitPolicy::Apply),
                }),
            },
            repo: Some(RepoConfig {
                comparison: Some(ComparisonConfig {
                    program: None,
                    timeout_secs: Some(5),
                }),
                ignore: Some(IgnoreConfig {
                    commits: vec!["repo".into()],
                    single_commit: Some(SingleCommitPolicy::Bypass),
                }),
            }),
            global_path: None,
            repo_path: None,
        };

        assert_eq!(config.comparison_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.single_commit_policy(), SingleCommitPolicy::Bypass);

        // Ignore lists are unions, not overrides
        let ignored = config.ignored_commits();
        assert!(ignored.contains("global"));
        assert!(ignored.contains("repo"));
    }

    #[test]
    fn global_setting_used_when_repo_silent() {
        let config = Config {
            global: GlobalConfig {
                comparison: Some(ComparisonConfig {
                    program: None,
                    timeout_secs: Some(42),
                }),
                ..Default::default()
            },
            repo: Some(RepoConfig::default()),
            global_path: None,
            repo_path: None,
        };

        assert_eq!(config.comparison_timeout(), Some(Duration::from_secs(42)));
    }
}
