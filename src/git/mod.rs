//! git
//!
//! Single interface for all Git operations.
//!
//! # Architecture
//!
//! This module is the **ONLY doorway** to Git. All repository reads flow
//! through this interface. No other module should import `git2`, and no
//! other module spawns the git CLI.
//!
//! Repository reads use the `git2` crate. The one exception is the
//! patch-equivalence comparison, which libgit2 does not provide; it runs
//! `git cherry` through [`cherry::GitCherry`].
//!
//! # Responsibilities
//!
//! - Repository opening
//! - Revision resolution (hashes, branches, tags, revspecs)
//! - Reachability walks and history search
//! - Commit metadata extraction
//! - Patch-equivalence comparison
//!
//! # Invariants
//!
//! - The repository is never mutated
//! - All operations return strong types (Oid, CommitInfo)
//!
//! # Example
//!
//! ```ignore
//! use rangelog::git::Git;
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("."))?;
//! let include = git.resolve_commit("HEAD")?;
//! let exclude = git.resolve_commit("v1.0")?;
//! for oid in git.walk_range(&exclude, &include)? {
//!     println!("{}", git.commit_info(&oid)?.summary);
//! }
//! ```

pub mod cherry;
mod interface;

pub use cherry::{
    parse_cherry_output, CherryEntry, CherryMarker, ComparisonError, GitCherry, Invocation,
    PatchComparison,
};
pub use interface::{format_commit_date, CommitInfo, Git, GitError, COMMIT_DATE_FORMAT};
