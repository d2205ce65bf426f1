//! cherry command - List the commits a cherry comparison marks as new
//!
//! Every commit is looked up before anything is printed, so a lookup that
//! fails part way leaves stdout empty.

use anyhow::{Context as _, Result};

use super::{write_commits, Context};
use crate::git::CommitInfo;

/// List commits of `base` with no patch-equivalent on `branch`.
pub fn cherry(ctx: &Context, base: &str, branch: &str) -> Result<()> {
    let resolver = ctx.resolver();
    let commits: Vec<CommitInfo> = resolver
        .branch_comparison(base, branch)
        .and_then(|commits| commits.collect::<Result<Vec<_>, _>>())
        .with_context(|| format!("failed to compare {} against {}", branch, base))?;

    write_commits(ctx, commits.into_iter().map(Ok))?;
    Ok(())
}
