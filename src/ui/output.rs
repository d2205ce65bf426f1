//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Output is formatted consistently and respects the quiet flag.
//! With `--format json`, records are printed as a JSON array instead of
//! one line per commit. Diagnostics go to the logger, not through here.

use std::fmt::Display;
use std::io::{self, Write};

use clap::ValueEnum;
use log::LevelFilter;

use crate::git::CommitInfo;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - minimal output
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }

    /// Default log filter for this verbosity (`RUST_LOG` still wins).
    pub fn log_filter(self) -> LevelFilter {
        match self {
            Verbosity::Quiet => LevelFilter::Error,
            Verbosity::Normal => LevelFilter::Warn,
            Verbosity::Debug => LevelFilter::Debug,
        }
    }
}

/// How resolved commits are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per commit: short hash, date, author email, summary
    #[default]
    Text,
    /// A JSON array of commit records
    Json,
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a warning message (respects quiet mode).
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("warning: {}", message);
    }
}

/// Format one commit as a text line.
pub fn format_commit(commit: &CommitInfo) -> String {
    format!(
        "{} {} {} {}",
        commit.hash.short(10),
        commit.date,
        commit.author_email,
        commit.summary
    )
}

/// Writes commits to a stream in the chosen format.
///
/// Text records are written as they arrive;
/// JSON records are buffered until [`CommitWriter::finish`].
pub struct CommitWriter<W: Write> {
    out: W,
    format: OutputFormat,
    buffered: Vec<CommitInfo>,
    written: usize,
}

impl<W: Write> CommitWriter<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self {
            out,
            format,
            buffered: Vec::new(),
            written: 0,
        }
    }

    /// Write (or buffer) one commit.
    pub fn write(&mut self, commit: CommitInfo) -> io::Result<()> {
        self.written += 1;
        match self.format {
            OutputFormat::Text => writeln!(self.out, "{}", format_commit(&commit)),
            OutputFormat::Json => {
                self.buffered.push(commit);
                Ok(())
            }
        }
    }

    /// Flush buffered output and return the number of commits written.
    pub fn finish(mut self) -> io::Result<usize> {
        if self.format == OutputFormat::Json {
            serde_json::to_writer_pretty(&mut self.out, &self.buffered)?;
            writeln!(self.out)?;
        }
        self.out.flush()?;
        Ok(self.written)
    }
}
