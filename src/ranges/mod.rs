//! ranges
//!
//! Resolution of commit ranges into commit metadata.
//!
//! # Range shapes
//!
//! - **Reachability**: commits reachable from one reference and not from
//!   another (`git rev-list A..B`), newest first.
//! - **Single commit**: one commit found by its exact full hash in the
//!   history of HEAD.
//! - **Branch comparison**: the `+` lines of
//!   `git cherry -v <branch> <base_branch>`, in the comparison's order. Git
//!   takes `<branch>` as upstream, so these are commits of `base_branch`
//!   with no patch-equivalent on `branch`.
//!
//! # Failure policy
//!
//! "Not found" is not an error here. A missing repository, an unresolvable
//! reference, or a missing object produces an empty result, the same as a
//! range that is legitimately empty. Everything else is a [`RangeError`]:
//! a broken comparison tool, unreadable comparison output, a comparison
//! hash the repository cannot resolve, or a repository that fails to read.
//!
//! # Example
//!
//! ```no_run
//! use rangelog::core::types::IgnoreSet;
//! use rangelog::ranges::RangeResolver;
//!
//! let resolver = RangeResolver::new("/path/to/repo", IgnoreSet::new());
//! for commit in resolver.reachability_range("v1.0", "v1.1")? {
//!     println!("{} {}", commit.hash.short(7), commit.summary);
//! }
//! for commit in resolver.branch_comparison("main", "feature")? {
//!     println!("{}", commit?.summary);
//! }
//! # Ok::<(), rangelog::ranges::RangeError>(())
//! ```

mod branch;

pub use branch::BranchCommits;

use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;

use crate::core::config::Config;
use crate::core::types::{IgnoreSet, RangeDescriptor, SingleCommitPolicy};
use crate::git::{
    parse_cherry_output, CommitInfo, ComparisonError, Git, GitCherry, GitError, PatchComparison,
};

/// Errors from range resolution.
///
/// Not-found conditions never appear here; they resolve to empty results.
#[derive(Debug, Error)]
pub enum RangeError {
    /// Reading the repository failed for a reason other than "not found".
    #[error(transparent)]
    Git(#[from] GitError),

    /// The patch comparison could not be run or read.
    #[error(transparent)]
    Comparison(#[from] ComparisonError),

    /// The comparison reported a commit the repository cannot resolve.
    #[error("comparison listed commit {hash}, which cannot be looked up: {source}")]
    UnresolvedCommit {
        hash: String,
        #[source]
        source: GitError,
    },
}

/// Turn not-found git errors into an empty result.
fn absorb_not_found<T: Default>(result: Result<T, GitError>) -> Result<T, RangeError> {
    match result {
        Ok(value) => Ok(value),
        Err(e) if e.is_not_found() => {
            debug!("treating as empty: {}", e);
            Ok(T::default())
        }
        Err(e) => Err(e.into()),
    }
}

/// Resolves range requests against one repository path.
///
/// Each call opens its own repository handle and releases it before
/// returning, except [`RangeResolver::branch_comparison`], whose iterator
/// holds the handle until it is exhausted or dropped.
#[derive(Debug, Clone)]
pub struct RangeResolver<C = GitCherry> {
    path: PathBuf,
    ignore: IgnoreSet,
    single_commit: SingleCommitPolicy,
    comparison: C,
}

impl RangeResolver<GitCherry> {
    /// Create a resolver with the default `git cherry` runner.
    pub fn new(path: impl Into<PathBuf>, ignore: IgnoreSet) -> Self {
        Self {
            path: path.into(),
            ignore,
            single_commit: SingleCommitPolicy::default(),
            comparison: GitCherry::default(),
        }
    }

    /// Create a resolver using configured ignores, policy and comparison tool.
    ///
    /// Commits ignored in `config` are added to `ignore`.
    pub fn from_config(path: impl Into<PathBuf>, mut ignore: IgnoreSet, config: &Config) -> Self {
        ignore.extend(config.ignored_commits());
        Self {
            path: path.into(),
            ignore,
            single_commit: config.single_commit_policy(),
            comparison: GitCherry::from_config(config),
        }
    }
}

impl<C: PatchComparison> RangeResolver<C> {
    /// Replace the patch comparison used for branch comparisons.
    pub fn with_comparison<D: PatchComparison>(self, comparison: D) -> RangeResolver<D> {
        RangeResolver {
            path: self.path,
            ignore: self.ignore,
            single_commit: self.single_commit,
            comparison,
        }
    }

    /// Choose whether single-commit lookups honor the ignore set.
    pub fn with_single_commit_policy(mut self, policy: SingleCommitPolicy) -> Self {
        self.single_commit = policy;
        self
    }

    /// The repository path this resolver opens.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The hashes this resolver drops.
    pub fn ignore(&self) -> &IgnoreSet {
        &self.ignore
    }

    /// Resolve any range shape, collecting the result.
    pub fn resolve(&self, range: &RangeDescriptor) -> Result<Vec<CommitInfo>, RangeError> {
        debug!("resolving {} in {}", range, self.path.display());
        match range {
            RangeDescriptor::Reachability {
                exclude_from,
                include_from,
            } => self.reachability_range(exclude_from, include_from),
            RangeDescriptor::Single { hash } => self.single_commit(hash),
            RangeDescriptor::BranchComparison {
                base_branch,
                branch,
            } => self.branch_comparison(base_branch, branch)?.collect(),
        }
    }

    /// Commits reachable from `include_from` but not from `exclude_from`.
    ///
    /// Newest first by committer time, minus ignored hashes. Empty when the
    /// repository or either reference cannot be found.
    pub fn reachability_range(
        &self,
        exclude_from: &str,
        include_from: &str,
    ) -> Result<Vec<CommitInfo>, RangeError> {
        absorb_not_found(self.walk(exclude_from, include_from))
    }

    fn walk(&self, exclude_from: &str, include_from: &str) -> Result<Vec<CommitInfo>, GitError> {
        let git = Git::open(&self.path)?;
        let exclude = git.resolve_commit(exclude_from)?;
        let include = git.resolve_commit(include_from)?;

        git.walk_range(&exclude, &include)?
            .into_iter()
            .filter(|oid| {
                let ignored = self.ignore.contains(oid.as_str());
                if ignored {
                    debug!("skipping ignored commit {}", oid);
                }
                !ignored
            })
            .map(|oid| git.commit_info(&oid))
            .collect()
    }

    /// The commit whose full hash is exactly `hash`, if HEAD's history has it.
    ///
    /// Returns zero or one record. The ignore set only applies under
    /// [`SingleCommitPolicy::Apply`].
    pub fn single_commit(&self, hash: &str) -> Result<Vec<CommitInfo>, RangeError> {
        let found = absorb_not_found(self.find(hash))?;

        Ok(found
            .into_iter()
            .filter(|info| match self.single_commit {
                SingleCommitPolicy::Bypass => true,
                SingleCommitPolicy::Apply => !self.ignore.contains(info.hash.as_str()),
            })
            .collect())
    }

    fn find(&self, hash: &str) -> Result<Vec<CommitInfo>, GitError> {
        let git = Git::open(&self.path)?;
        match git.find_in_history(hash)? {
            Some(oid) => Ok(vec![git.commit_info(&oid)?]),
            None => Ok(Vec::new()),
        }
    }

    /// Commits of `base_branch` with no patch-equivalent on `branch`.
    ///
    /// Runs `cherry -v <branch> <base_branch>` and keeps its `+` lines; git
    /// reads the arguments as `<upstream> <head>`.
    ///
    /// The comparison runs to completion before this returns, so a failing
    /// tool produces an error and no records. Lookups happen lazily as the
    /// returned iterator is consumed. Empty when the repository or either
    /// branch cannot be found; the tool is not run in that case.
    pub fn branch_comparison(
        &self,
        base_branch: &str,
        branch: &str,
    ) -> Result<BranchCommits<'_>, RangeError> {
        let Some(git) = absorb_not_found(self.open_with_refs(&[base_branch, branch]))? else {
            return Ok(BranchCommits::empty(&self.ignore));
        };

        let output = self.comparison.compare(git.tool_dir(), branch, base_branch)?;
        let entries = parse_cherry_output(&output)?;
        debug!(
            "comparison of {} against {} listed {} commits",
            branch,
            base_branch,
            entries.len()
        );

        Ok(BranchCommits::new(git, entries, &self.ignore))
    }

    fn open_with_refs(&self, refs: &[&str]) -> Result<Option<Git>, GitError> {
        let git = Git::open(&self.path)?;
        for reference in refs {
            git.resolve_commit(reference)?;
        }
        Ok(Some(git))
    }
}
