//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Global Config
//!
//! Located at (in order of precedence):
//! 1. `$RANGELOG_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/rangelog/config.toml`
//! 3. `~/.rangelog/config.toml`
//!
//! # Repo Config
//!
//! Located at `<git dir>/rangelog/config.toml` (canonical) or `.rangelog.toml`
//! in the work tree root.
//!
//! # Validation
//!
//! Config values are validated after parsing so that a bad value fails at
//! load time rather than in the middle of a resolution.

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::types::SingleCommitPolicy;

/// Global configuration (user scope).
///
/// # Example
///
/// ```toml
/// [comparison]
/// program = "/opt/git/bin/git"
/// timeout_secs = 60
///
/// [ignore]
/// single_commit = "bypass"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Patch-comparison tool settings
    pub comparison: Option<ComparisonConfig>,

    /// Ignore defaults
    pub ignore: Option<IgnoreConfig>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(comparison) = &self.comparison {
            comparison.validate()?;
        }
        if let Some(ignore) = &self.ignore {
            ignore.validate()?;
        }
        Ok(())
    }
}

/// Repository configuration.
///
/// # Example
///
/// ```toml
/// [ignore]
/// commits = [
///     "0123456789abcdef0123456789abcdef01234567",
/// ]
/// single_commit = "apply"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RepoConfig {
    /// Patch-comparison tool overrides for this repository
    pub comparison: Option<ComparisonConfig>,

    /// Commits ignored in this repository
    pub ignore: Option<IgnoreConfig>,
}

impl RepoConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(comparison) = &self.comparison {
            comparison.validate()?;
        }
        if let Some(ignore) = &self.ignore {
            ignore.validate()?;
        }
        Ok(())
    }
}

/// Settings for the external `git cherry` invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ComparisonConfig {
    /// Program to run (default: `git`, resolved through `PATH`)
    pub program: Option<String>,

    /// Seconds before the comparison is killed; 0 disables the timeout
    pub timeout_secs: Option<u64>,
}

impl ComparisonConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(program) = &self.program {
            if program.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "comparison.program cannot be empty".into(),
                ));
            }
        }
        Ok(())
    }
}

/// Ignore-set configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct IgnoreConfig {
    /// Full commit hashes to drop from every resolved range
    pub commits: Vec<String>,

    /// Whether single-commit lookups honor the ignore set
    pub single_commit: Option<SingleCommitPolicy>,
}

impl IgnoreConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(bad) = self.commits.iter().find(|c| c.trim().is_empty()) {
            return Err(ConfigError::InvalidValue(format!(
                "ignore.commits contains an empty entry: {:?}",
                bad
            )));
        }
        Ok(())
    }
}
