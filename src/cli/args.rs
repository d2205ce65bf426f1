//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--repo <path>`: Repository to read (default: current directory)
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output
//! - `--format <text|json>`: Output format
//! - `--ignore <hash>` / `--ignore-file <path>`: Commits to leave out

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::ui::output::OutputFormat;

/// rangelog - Resolve commit ranges into commit metadata
#[derive(Parser, Debug)]
#[command(name = "rangelog")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Repository to read (the work tree root or the .git directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub repo: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Leave this commit out of the results (full hash, repeatable)
    #[arg(long = "ignore", global = true, value_name = "HASH")]
    pub ignore: Vec<String>,

    /// Read commits to leave out from a file, one full hash per line
    #[arg(long, global = true, value_name = "PATH")]
    pub ignore_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List commits reachable from one reference but not another
    #[command(
        name = "range",
        long_about = "List commits reachable from INCLUDE but not from EXCLUDE.\n\n\
            This is the same set `git rev-list EXCLUDE..INCLUDE` prints, newest first. \
            Either side may be a hash, branch, tag or revspec. If the repository or \
            either reference does not exist the result is empty.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Everything since the last release
    rangelog range v1.4.0 HEAD

    # Machine-readable, skipping a version bump commit
    rangelog --format json --ignore 3f1c0a9e... range v1.4.0 v1.5.0"
    )]
    Range {
        /// Reference whose history is excluded
        exclude: String,
        /// Reference whose history is included
        include: String,
    },

    /// Show one commit by its full hash
    #[command(
        name = "commit",
        long_about = "Show the commit whose full hash is exactly HASH.\n\n\
            The history of HEAD is searched for an exact match; abbreviated hashes \
            do not match. Ignored commits are still shown unless --apply-ignore is \
            given or the config sets `ignore.single_commit = \"apply\"`."
    )]
    Commit {
        /// Full commit hash
        hash: String,

        /// Drop the commit if it is in the ignore set
        #[arg(long)]
        apply_ignore: bool,
    },

    /// List commits of BASE with no patch-equivalent on BRANCH
    #[command(
        name = "cherry",
        long_about = "List the commits `git cherry -v BRANCH BASE` marks as new.\n\n\
            Git reads BRANCH as upstream and BASE as head, so these are the commits \
            of BASE whose patch is not on BRANCH, in the order git prints them \
            (oldest first). Nothing is printed unless every commit resolves. The git \
            program can be set with $RANGELOG_GIT or `comparison.program` in the config.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Commits on main with no equivalent on release/2.0 (git cherry -v release/2.0 main)
    rangelog cherry main release/2.0"
    )]
    Cherry {
        /// Branch whose commits are listed (`<head>` for git cherry)
        base: String,
        /// Branch the commits are checked against (`<upstream>` for git cherry)
        branch: String,
    },

    /// Resolve range notation (A..B, A...B, or a hash)
    #[command(
        name = "resolve",
        long_about = "Resolve range notation.\n\n\
            `A..B` behaves like `range A B`, `A...B` like `cherry A B` (commits of A \
            with no equivalent on B), and anything else like `commit`."
    )]
    Resolve {
        /// Range notation
        spec: String,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        after_help = "\
WORKFLOW EXAMPLES:
    # Bash
    rangelog completion bash > ~/.local/share/bash-completion/completions/rangelog

    # Zsh
    rangelog completion zsh > ~/.zfunc/_rangelog"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
