//! range command - List commits reachable from one reference but not another

use anyhow::{Context as _, Result};

use super::{write_commits, Context};

/// List commits reachable from `include` but not from `exclude`.
pub fn range(ctx: &Context, exclude: &str, include: &str) -> Result<()> {
    let commits = ctx
        .resolver()
        .reachability_range(exclude, include)
        .with_context(|| format!("failed to resolve {}..{}", exclude, include))?;

    write_commits(ctx, commits.into_iter().map(Ok))?;
    Ok(())
}
