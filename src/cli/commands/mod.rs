//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Builds a [`RangeResolver`] from the [`Context`]
//! 2. Resolves its range shape
//! 3. Writes the commits in the requested format
//!
//! An empty result is a success with no output. Any [`crate::ranges::RangeError`]
//! is returned as an error and ends the process with a non-zero status.

mod cherry;
mod commit;
mod completion;
mod range;
mod resolve;

pub use cherry::cherry;
pub use commit::commit;
pub use completion::completion;
pub use range::range;
pub use resolve::resolve;

use std::io;
use std::path::PathBuf;

use anyhow::{Context as _, Result};
use log::debug;

use crate::cli::args::Command;
use crate::core::config::Config;
use crate::core::types::IgnoreSet;
use crate::git::CommitInfo;
use crate::ranges::RangeResolver;
use crate::ui::output::{CommitWriter, OutputFormat, Verbosity};

/// Everything a command handler needs.
#[derive(Debug, Clone)]
pub struct Context {
    /// Repository path
    pub repo: PathBuf,
    /// Output verbosity
    pub verbosity: Verbosity,
    /// Output format
    pub format: OutputFormat,
    /// Commits ignored on the command line
    pub ignore: IgnoreSet,
    /// Loaded configuration
    pub config: Config,
}

impl Context {
    /// Build a resolver from the command line and configuration.
    pub fn resolver(&self) -> RangeResolver {
        RangeResolver::from_config(&self.repo, self.ignore.clone(), &self.config)
    }
}

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Range { exclude, include } => range(ctx, &exclude, &include),
        Command::Commit { hash, apply_ignore } => commit(ctx, &hash, apply_ignore),
        Command::Cherry { base, branch } => cherry(ctx, &base, &branch),
        Command::Resolve { spec } => resolve(ctx, &spec),
        Command::Completion { shell } => completion(shell),
    }
}

/// Write commits to stdout in the context's format.
///
/// Quiet mode still prints the commits; they are the command's result.
pub(crate) fn write_commits<I>(ctx: &Context, commits: I) -> Result<usize>
where
    I: IntoIterator<Item = Result<CommitInfo>>,
{
    let stdout = io::stdout();
    let mut writer = CommitWriter::new(stdout.lock(), ctx.format);
    for commit in commits {
        writer.write(commit?).context("failed to write output")?;
    }
    let written = writer.finish().context("failed to write output")?;
    debug!("printed {} commits", written);
    Ok(written)
}
