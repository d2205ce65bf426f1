//! git::interface
//!
//! Git interface implementation using git2.
//!
//! This module provides the **single doorway** to repository reads in
//! rangelog. All commit lookups and revision walks flow through this
//! interface, which returns structured results and normalizes errors into
//! typed failure categories.
//!
//! # Error Handling
//!
//! Git errors are categorized into typed variants:
//! - [`GitError::NotARepo`]: No repository at the given path
//! - [`GitError::RefNotFound`]: A reference could not be resolved
//! - [`GitError::ObjectNotFound`]: An object id names nothing in the repository
//! - [`GitError::InvalidRevspec`]: A revision string could not be parsed
//!
//! [`GitError::is_not_found`] groups the categories that callers treat as
//! "nothing there" rather than as failures.
//!
//! # Example
//!
//! ```ignore
//! use rangelog::git::Git;
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("."))?;
//! let tip = git.resolve_commit("main")?;
//! println!("main is at {}", tip.short(7));
//! ```

use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, Utc};
use log::debug;
use serde::Serialize;
use thiserror::Error;

use crate::core::config::RepoDirs;
use crate::core::types::{Oid, TypeError};

/// Date format used for [`CommitInfo::date`] (`MM/dd/YYYY`).
pub const COMMIT_DATE_FORMAT: &str = "%m/%d/%Y";

/// Errors from Git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// No repository at the given path.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was opened
        path: PathBuf,
    },

    /// Requested ref does not exist.
    #[error("ref not found: {refname}")]
    RefNotFound {
        /// The ref that was not found
        refname: String,
    },

    /// Object not found in repository.
    #[error("object not found: {oid}")]
    ObjectNotFound {
        /// The OID that was not found
        oid: String,
    },

    /// Invalid object id format.
    #[error("invalid object id: {oid}")]
    InvalidOid {
        /// The invalid OID string
        oid: String,
    },

    /// Revision string could not be parsed or is ambiguous.
    #[error("invalid revision '{spec}': {message}")]
    InvalidRevspec {
        /// The revision string
        spec: String,
        /// What git2 reported
        message: String,
    },

    /// Permission or filesystem error.
    #[error("repository access error: {message}")]
    AccessError {
        /// Description of the error
        message: String,
    },

    /// Internal git2 error.
    #[error("git error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl GitError {
    /// Create a GitError from a git2::Error with richer context.
    fn from_git2(err: git2::Error, context: &str) -> Self {
        match err.code() {
            git2::ErrorCode::NotFound => {
                if context.starts_with("refs/") || context == "HEAD" {
                    GitError::RefNotFound {
                        refname: context.to_string(),
                    }
                } else {
                    GitError::ObjectNotFound {
                        oid: context.to_string(),
                    }
                }
            }
            git2::ErrorCode::InvalidSpec | git2::ErrorCode::Ambiguous => {
                GitError::InvalidRevspec {
                    spec: context.to_string(),
                    message: err.message().to_string(),
                }
            }
            git2::ErrorCode::Locked => GitError::AccessError {
                message: format!("repository is locked: {}", err.message()),
            },
            _ => GitError::Internal {
                message: format!("{}: {}", context, err.message()),
            },
        }
    }

    /// Whether this error means "the thing asked for is not there".
    ///
    /// Range resolution turns these into empty results.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            GitError::NotARepo { .. }
                | GitError::RefNotFound { .. }
                | GitError::ObjectNotFound { .. }
                | GitError::InvalidRevspec { .. }
        )
    }
}

impl From<git2::Error> for GitError {
    fn from(err: git2::Error) -> Self {
        match err.code() {
            git2::ErrorCode::NotFound => GitError::ObjectNotFound {
                oid: err.message().to_string(),
            },
            _ => GitError::Internal {
                message: err.message().to_string(),
            },
        }
    }
}

impl From<TypeError> for GitError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::InvalidOid(msg) => GitError::InvalidOid { oid: msg },
            TypeError::InvalidRange(msg) => GitError::InvalidRevspec {
                spec: msg,
                message: "not a revision".into(),
            },
        }
    }
}

/// Metadata of one commit, as handed to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitInfo {
    /// Full commit hash
    pub hash: Oid,
    /// First line of the commit message
    pub summary: String,
    /// Full commit message
    pub message: String,
    /// Committer date as `MM/dd/YYYY` in the committer's offset
    pub date: String,
    /// Author email
    pub author_email: String,
}

/// Format a git timestamp as a commit date.
///
/// `offset_minutes` is the committer's UTC offset; out-of-range values fall
/// back to UTC.
pub fn format_commit_date(seconds: i64, offset_minutes: i32) -> String {
    let utc = DateTime::from_timestamp(seconds, 0).unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
    match FixedOffset::east_opt(offset_minutes * 60) {
        Some(offset) => utc.with_timezone(&offset).format(COMMIT_DATE_FORMAT).to_string(),
        None => utc.format(COMMIT_DATE_FORMAT).to_string(),
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// The Git interface.
///
/// Wraps one open repository handle. Dropping a `Git` releases the handle.
pub struct Git {
    /// The underlying git2 repository
    repo: git2::Repository,
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git")
            .field("path", &self.repo.path())
            .finish()
    }
}

impl Git {
    // =========================================================================
    // Repository Opening and Info
    // =========================================================================

    /// Open the repository at exactly the given path.
    ///
    /// `path` must be the work tree root or the git directory; parent
    /// directories are not searched. Bare repositories are accepted.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotARepo`] if there is no repository at `path`
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = git2::Repository::open(path).map_err(|e| match e.code() {
            git2::ErrorCode::NotFound => GitError::NotARepo {
                path: path.to_path_buf(),
            },
            _ => GitError::AccessError {
                message: format!("{}: {}", path.display(), e.message()),
            },
        })?;

        debug!("opened repository at {}", repo.path().display());
        Ok(Self { repo })
    }

    /// Where this repository keeps its files, for locating repo config.
    pub fn dirs(&self) -> RepoDirs {
        RepoDirs {
            git_dir: self.repo.path().to_path_buf(),
            work_tree: self.repo.workdir().map(Path::to_path_buf),
        }
    }

    /// Directory external git tools should run in.
    ///
    /// The work tree for normal repositories, the git directory for bare ones.
    pub fn tool_dir(&self) -> &Path {
        self.repo.workdir().unwrap_or_else(|| self.repo.path())
    }

    // =========================================================================
    // Revision Resolution
    // =========================================================================

    /// Resolve any revision string to the commit it names.
    ///
    /// Accepts full or abbreviated hashes, branch and tag names, and
    /// revspec expressions such as `HEAD~2`. Tags are peeled to commits.
    ///
    /// # Errors
    ///
    /// - [`GitError::ObjectNotFound`] if nothing matches
    /// - [`GitError::InvalidRevspec`] if the string is malformed or ambiguous
    pub fn resolve_commit(&self, spec: &str) -> Result<Oid, GitError> {
        let commit = self.find_commit_by_spec(spec)?;
        Ok(Oid::new(commit.id().to_string())?)
    }

    fn find_commit_by_spec(&self, spec: &str) -> Result<git2::Commit<'_>, GitError> {
        let object = self
            .repo
            .revparse_single(spec)
            .map_err(|e| GitError::from_git2(e, spec))?;

        object
            .peel_to_commit()
            .map_err(|e| GitError::from_git2(e, spec))
    }

    // =========================================================================
    // History Walks
    // =========================================================================

    /// List commits reachable from `include` but not from `exclude`.
    ///
    /// Ordered newest first by committer time. Equivalent to
    /// `git rev-list --date-order exclude..include`.
    pub fn walk_range(&self, exclude: &Oid, include: &Oid) -> Result<Vec<Oid>, GitError> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(git2::Sort::TIME)?;
        revwalk
            .push(Self::raw_oid(include)?)
            .map_err(|e| GitError::from_git2(e, include.as_str()))?;
        revwalk
            .hide(Self::raw_oid(exclude)?)
            .map_err(|e| GitError::from_git2(e, exclude.as_str()))?;

        let mut oids = Vec::new();
        for oid in revwalk {
            oids.push(Oid::new(oid?.to_string())?);
        }

        debug!("walked {}..{}: {} commits", exclude.short(7), include.short(7), oids.len());
        Ok(oids)
    }

    /// Search the history of HEAD for a commit whose full hash is `hash`.
    ///
    /// Comparison is exact string equality, so abbreviated or upper-case
    /// hashes never match. Returns `None` for an unborn HEAD.
    pub fn find_in_history(&self, hash: &str) -> Result<Option<Oid>, GitError> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(git2::Sort::TIME)?;

        match revwalk.push_head() {
            Ok(()) => {}
            Err(e)
                if matches!(
                    e.code(),
                    git2::ErrorCode::UnbornBranch | git2::ErrorCode::NotFound
                ) =>
            {
                debug!("HEAD is unborn, history is empty");
                return Ok(None);
            }
            Err(e) => return Err(GitError::from_git2(e, "HEAD")),
        }

        for oid in revwalk {
            let oid = oid?;
            if oid.to_string() == hash {
                return Ok(Some(Oid::new(hash)?));
            }
        }

        Ok(None)
    }

    // =========================================================================
    // Commit Information
    // =========================================================================

    /// Get information about a commit.
    ///
    /// # Errors
    ///
    /// - [`GitError::ObjectNotFound`] if the commit doesn't exist
    pub fn commit_info(&self, oid: &Oid) -> Result<CommitInfo, GitError> {
        let commit = self
            .repo
            .find_commit(Self::raw_oid(oid)?)
            .map_err(|e| GitError::from_git2(e, oid.as_str()))?;

        Self::to_commit_info(&commit)
    }

    /// Look up a commit by any identifier git understands and describe it.
    ///
    /// # Errors
    ///
    /// - [`GitError::ObjectNotFound`] / [`GitError::InvalidRevspec`] if
    ///   `id` names no commit
    pub fn lookup_commit(&self, id: &str) -> Result<CommitInfo, GitError> {
        let commit = self.find_commit_by_spec(id)?;
        Self::to_commit_info(&commit)
    }

    fn to_commit_info(commit: &git2::Commit<'_>) -> Result<CommitInfo, GitError> {
        let committed = commit.committer().when();
        let author = commit.author();

        // Messages in legacy encodings are not valid UTF-8; keep them lossily.
        Ok(CommitInfo {
            hash: Oid::new(commit.id().to_string())?,
            summary: lossy(commit.summary_bytes().unwrap_or_default()),
            message: lossy(commit.message_bytes()),
            date: format_commit_date(committed.seconds(), committed.offset_minutes()),
            author_email: lossy(author.email_bytes()),
        })
    }

    fn raw_oid(oid: &Oid) -> Result<git2::Oid, GitError> {
        git2::Oid::from_str(oid.as_str()).map_err(|e| GitError::from_git2(e, oid.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod git_error {
        use super::*;

        #[test]
        fn not_found_classification() {
            assert!(GitError::NotARepo {
                path: PathBuf::from("/tmp"),
            }
            .is_not_found());
            assert!(GitError::RefNotFound {
                refname: "HEAD".into(),
            }
            .is_not_found());
            assert!(GitError::ObjectNotFound {
                oid: "abc123".into(),
            }
            .is_not_found());
            assert!(GitError::InvalidRevspec {
                spec: "a b".into(),
                message: "bad".into(),
            }
            .is_not_found());

            assert!(!GitError::AccessError {
                message: "locked".into(),
            }
            .is_not_found());
            assert!(!GitError::Internal {
                message: "oops".into(),
            }
            .is_not_found());
            assert!(!GitError::InvalidOid {
                oid: "xyz".into(),
            }
            .is_not_found());
        }

        #[test]
        fn from_git2_uses_context() {
            let err = git2::Error::new(
                git2::ErrorCode::NotFound,
                git2::ErrorClass::Reference,
                "missing",
            );
            assert!(matches!(
                GitError::from_git2(err, "refs/heads/main"),
                GitError::RefNotFound { .. }
            ));

            let err = git2::Error::new(
                git2::ErrorCode::NotFound,
                git2::ErrorClass::Odb,
                "missing",
            );
            assert!(matches!(
                GitError::from_git2(err, "deadbeef"),
                GitError::ObjectNotFound { .. }
            ));

            let err = git2::Error::new(
                git2::ErrorCode::Ambiguous,
                git2::ErrorClass::Odb,
                "ambiguous",
            );
            assert!(GitError::from_git2(err, "ab").is_not_found());
        }

        #[test]
        fn error_display_formatting() {
            let err = GitError::InvalidRevspec {
                spec: "main^^^{bad}".into(),
                message: "failed to parse".into(),
            };
            assert!(err.to_string().contains("main^^^{bad}"));
        }
    }

    mod commit_date {
        use super::*;

        #[test]
        fn formats_month_day_year() {
            // 2021-03-04T05:06:07Z
            assert_eq!(format_commit_date(1_614_834_367, 0), "03/04/2021");
        }

        #[test]
        fn uses_committer_offset() {
            // 2021-03-04T23:30:00Z is already March 5th in UTC+2
            assert_eq!(format_commit_date(1_614_900_600, 0), "03/04/2021");
            assert_eq!(format_commit_date(1_614_900_600, 120), "03/05/2021");
            assert_eq!(format_commit_date(1_614_900_600, -60), "03/04/2021");
        }

        #[test]
        fn invalid_offset_falls_back_to_utc() {
            assert_eq!(format_commit_date(1_614_834_367, 100_000), "03/04/2021");
        }
    }
}
