//! resolve command - Resolve range notation

use anyhow::{Context as _, Result};

use super::{cherry, commit, range, Context};
use crate::core::types::RangeDescriptor;

/// Parse `spec` and run the matching command.
pub fn resolve(ctx: &Context, spec: &str) -> Result<()> {
    let descriptor = RangeDescriptor::parse(spec).context("invalid range notation")?;

    match descriptor {
        RangeDescriptor::Reachability {
            exclude_from,
            include_from,
        } => range(ctx, &exclude_from, &include_from),
        RangeDescriptor::Single { hash } => commit(ctx, &hash, false),
        RangeDescriptor::BranchComparison {
            base_branch,
            branch,
        } => cherry(ctx, &base_branch, &branch),
    }
}
