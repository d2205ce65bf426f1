//! cli
//!
//! Command-line interface layer for rangelog.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Set up logging, configuration and the ignore set
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap, builds a
//! [`commands::Context`] and dispatches to a handler, which resolves the
//! range through [`crate::ranges`] and prints it through [`crate::ui`].

pub mod args;
pub mod commands;

pub use args::{Cli, Command, Shell};

use anyhow::{Context as _, Result};
use log::debug;

use crate::core::config::Config;
use crate::core::types::IgnoreSet;
use crate::git::Git;
use crate::ui::output::{self, Verbosity};

/// Initialize the logger.
///
/// `--debug` lowers the default filter to `debug`; `RUST_LOG` overrides it.
pub fn init_logging(verbosity: Verbosity) {
    env_logger::Builder::new()
        .filter_level(verbosity.log_filter())
        .parse_default_env()
        .format_timestamp(None)
        .try_init()
        .ok();
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    let verbosity = Verbosity::from_flags(cli.quiet, cli.debug);
    init_logging(verbosity);

    if let Command::Completion { shell } = cli.command {
        return commands::completion(shell);
    }

    let repo = match cli.repo {
        Some(path) => path,
        None => std::env::current_dir().context("cannot determine current directory")?,
    };

    // Repo config sits in the git directory, which only the repository knows
    let dirs = match Git::open(&repo) {
        Ok(git) => Some(git.dirs()),
        Err(e) => {
            debug!("no repository config: {}", e);
            None
        }
    };
    let loaded = Config::load(dirs.as_ref()).context("failed to load configuration")?;
    for warning in &loaded.warnings {
        output::warn(
            format!("{} ({})", warning.message, warning.path.display()),
            verbosity,
        );
    }

    let mut ignore: IgnoreSet = cli.ignore.into_iter().collect();
    if let Some(path) = &cli.ignore_file {
        let listed = IgnoreSet::from_file(path)
            .with_context(|| format!("failed to read ignore file '{}'", path.display()))?;
        ignore.extend(listed);
    }
    debug!("{} commits ignored from the command line", ignore.len());

    let ctx = commands::Context {
        repo,
        verbosity,
        format: cli.format,
        ignore,
        config: loaded.config,
    };

    commands::dispatch(cli.command, &ctx)
}
