//! rangelog - Resolve commit ranges into commit metadata
//!
//! rangelog answers "which commits does this range contain?" for a local
//! Git repository and returns, for each commit, its hash, summary, full
//! message, committer date and author email.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to ranges)
//! - [`ranges`] - Range resolution: reachability, single commit, branch comparison
//! - [`core`] - Domain types and configuration
//! - [`git`] - Repository access through git2 and the `git cherry` runner
//! - [`ui`] - Output formatting
//!
//! # Failure policy
//!
//! A repository, reference or commit that cannot be found resolves to an
//! empty result. Only genuine failures, such as a comparison tool that
//! cannot run, surface as errors.

pub mod cli;
pub mod core;
pub mod git;
pub mod ranges;
pub mod ui;
