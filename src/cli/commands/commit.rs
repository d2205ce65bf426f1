//! commit command - Show one commit by its full hash

use anyhow::{Context as _, Result};

use super::{write_commits, Context};
use crate::core::types::SingleCommitPolicy;

/// Show the commit whose full hash is `hash`.
///
/// `apply_ignore` forces [`SingleCommitPolicy::Apply`]; otherwise the
/// configured policy is used.
pub fn commit(ctx: &Context, hash: &str, apply_ignore: bool) -> Result<()> {
    let mut resolver = ctx.resolver();
    if apply_ignore {
        resolver = resolver.with_single_commit_policy(SingleCommitPolicy::Apply);
    }

    let commits = resolver
        .single_commit(hash)
        .with_context(|| format!("failed to look up {}", hash))?;

    write_commits(ctx, commits.into_iter().map(Ok))?;
    Ok(())
}
