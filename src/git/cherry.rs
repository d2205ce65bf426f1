//! git::cherry
//!
//! Patch-equivalence comparison between two branches.
//!
//! libgit2 has no counterpart to `git cherry`, so this is the one place
//! where rangelog runs the git CLI. The comparison sits behind the
//! [`PatchComparison`] trait; [`GitCherry`] is the process-backed
//! implementation.
//!
//! # Output format
//!
//! `git cherry -v <upstream> <head>` prints one line per commit of `head`
//! that is not in `upstream`, oldest first. [`GitCherry`] passes the branch
//! as `<upstream>` and the base branch as `<head>`:
//!
//! ```text
//! + 3f1c0a9e... Add parser for range notation
//! - 9b2d7e41... Fix typo (already upstream)
//! ```
//!
//! `+` marks a commit with no equivalent on the other side; anything else
//! marks a commit whose patch is already there.

use std::io::Read;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use log::debug;
use thiserror::Error;

use crate::core::config::Config;

/// How often a running comparison is polled for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// A command line, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program that was run
    pub program: String,
    /// Arguments passed to it
    pub args: Vec<String>,
}

impl std::fmt::Display for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Errors from running or reading a patch comparison.
#[derive(Debug, Error)]
pub enum ComparisonError {
    /// The comparison program could not be started.
    #[error("cannot run `{invocation}`: {source}")]
    Unavailable {
        invocation: Invocation,
        source: std::io::Error,
    },

    /// The comparison program exited unsuccessfully.
    #[error("`{invocation}` returned {status}: {stderr}")]
    Failed {
        invocation: Invocation,
        status: ExitStatus,
        stderr: String,
    },

    /// The comparison program ran past its deadline and was killed.
    #[error("`{invocation}` timed out after {}s", .timeout.as_secs())]
    TimedOut {
        invocation: Invocation,
        timeout: Duration,
    },

    /// The comparison printed a line that cannot be interpreted.
    #[error("malformed comparison output at line {line_number}: {line:?}")]
    Malformed { line_number: usize, line: String },
}

/// Whether a commit already has an equivalent on the base branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CherryMarker {
    /// `+`: no equivalent patch on the base branch.
    Added,
    /// `-` (or any other marker): an equivalent patch exists.
    Equivalent,
}

/// One line of comparison output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CherryEntry {
    pub marker: CherryMarker,
    /// Commit identifier as printed (second field)
    pub hash: String,
    /// Remaining text, usually the commit subject
    pub subject: Option<String>,
}

impl CherryEntry {
    /// True for commits unique to the compared branch.
    pub fn is_added(&self) -> bool {
        self.marker == CherryMarker::Added
    }
}

/// Parse `git cherry -v` output into entries, preserving order.
///
/// Blank lines are skipped. A `+` line without a hash is an error; lines
/// with other markers are kept as [`CherryMarker::Equivalent`] even when
/// they carry no hash, since they are never looked up.
pub fn parse_cherry_output(output: &str) -> Result<Vec<CherryEntry>, ComparisonError> {
    let mut entries = Vec::new();

    for (index, line) in output.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        let marker = if line.starts_with('+') {
            CherryMarker::Added
        } else {
            CherryMarker::Equivalent
        };

        let mut fields = line.splitn(3, char::is_whitespace);
        fields.next();
        let hash = fields.next().unwrap_or("").trim();
        let subject = fields
            .next()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        if hash.is_empty() {
            if marker == CherryMarker::Added {
                return Err(ComparisonError::Malformed {
                    line_number: index + 1,
                    line: line.to_string(),
                });
            }
            continue;
        }

        entries.push(CherryEntry {
            marker,
            hash: hash.to_string(),
            subject,
        });
    }

    Ok(entries)
}

/// A source of patch-equivalence comparisons.
pub trait PatchComparison {
    /// Compare `branch` against `base_branch` in the repository at `dir`.
    ///
    /// Returns the raw `git cherry -v` style output.
    fn compare(&self, dir: &Path, branch: &str, base_branch: &str)
        -> Result<String, ComparisonError>;
}

impl<T: PatchComparison + ?Sized> PatchComparison for &T {
    fn compare(
        &self,
        dir: &Path,
        branch: &str,
        base_branch: &str,
    ) -> Result<String, ComparisonError> {
        (**self).compare(dir, branch, base_branch)
    }
}

/// Runs `git cherry -v` as a child process.
#[derive(Debug, Clone)]
pub struct GitCherry {
    program: String,
    timeout: Option<Duration>,
}

impl Default for GitCherry {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl GitCherry {
    /// Create a runner for the given program (looked up through `PATH`).
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            timeout: None,
        }
    }

    /// Build a runner from configuration (program, `RANGELOG_GIT`, timeout).
    pub fn from_config(config: &Config) -> Self {
        Self {
            program: config.comparison_program(),
            timeout: config.comparison_timeout(),
        }
    }

    /// Kill the comparison if it runs longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// The argument list used for a comparison.
    pub fn arguments(branch: &str, base_branch: &str) -> Vec<String> {
        vec![
            "cherry".to_string(),
            "-v".to_string(),
            branch.to_string(),
            base_branch.to_string(),
        ]
    }

    fn wait(
        &self,
        child: &mut std::process::Child,
        invocation: &Invocation,
    ) -> Result<ExitStatus, ComparisonError> {
        let io_error = |source: std::io::Error| ComparisonError::Unavailable {
            invocation: invocation.clone(),
            source,
        };

        let Some(timeout) = self.timeout else {
            return child.wait().map_err(io_error);
        };

        let start = Instant::now();
        loop {
            if let Some(status) = child.try_wait().map_err(io_error)? {
                return Ok(status);
            }
            if start.elapsed() > timeout {
                let _ = child.kill();
                let _ = child.wait();
                return Err(ComparisonError::TimedOut {
                    invocation: invocation.clone(),
                    timeout,
                });
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

/// Drain a child pipe on its own thread so a full pipe cannot stall the child.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    })
}

impl PatchComparison for GitCherry {
    fn compare(
        &self,
        dir: &Path,
        branch: &str,
        base_branch: &str,
    ) -> Result<String, ComparisonError> {
        let invocation = Invocation {
            program: self.program.clone(),
            args: Self::arguments(branch, base_branch),
        };
        debug!("running `{}` in {}", invocation, dir.display());

        let mut child = Command::new(&self.program)
            .args(&invocation.args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ComparisonError::Unavailable {
                invocation: invocation.clone(),
                source,
            })?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = self.wait(&mut child, &invocation)?;
        let stdout = stdout.join().unwrap_or_default();
        let stderr = stderr.join().unwrap_or_default();

        if !status.success() {
            return Err(ComparisonError::Failed {
                invocation,
                status,
                stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
            });
        }

        debug!("`{}` printed {} bytes", invocation, stdout.len());
        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod parsing {
        use super::*;

        #[test]
        fn markers_and_fields() {
            let entries =
                parse_cherry_output("+ abc123 msg\n- def456 msg\n+ ghi789 msg").unwrap();

            assert_eq!(entries.len(), 3);
            assert_eq!(entries[0].marker, CherryMarker::Added);
            assert_eq!(entries[0].hash, "abc123");
            assert_eq!(entries[0].subject.as_deref(), Some("msg"));
            assert_eq!(entries[1].marker, CherryMarker::Equivalent);
            assert_eq!(entries[1].hash, "def456");
            assert!(entries[2].is_added());
        }

        #[test]
        fn order_preserved() {
            let entries = parse_cherry_output("+ c\n+ a\n+ b\n").unwrap();
            let hashes: Vec<_> = entries.iter().map(|e| e.hash.as_str()).collect();
            assert_eq!(hashes, ["c", "a", "b"]);
        }

        #[test]
        fn subject_optional() {
            let entries = parse_cherry_output("+ abc123\n").unwrap();
            assert_eq!(entries[0].subject, None);
        }

        #[test]
        fn subject_keeps_inner_spaces() {
            let entries = parse_cherry_output("+ abc123 Fix the  thing\n").unwrap();
            assert_eq!(entries[0].subject.as_deref(), Some("Fix the  thing"));
        }

        #[test]
        fn blank_lines_and_crlf_skipped() {
            let entries = parse_cherry_output("\n+ abc123 one\r\n\r\n- def456 two\r\n").unwrap();
            assert_eq!(entries.len(), 2);
            assert_eq!(entries[0].subject.as_deref(), Some("one"));
        }

        #[test]
        fn unknown_marker_is_equivalent() {
            let entries = parse_cherry_output("? abc123 odd\n").unwrap();
            assert_eq!(entries[0].marker, CherryMarker::Equivalent);
        }

        #[test]
        fn added_line_without_hash_is_malformed() {
            let err = parse_cherry_output("+ abc123\n+\n").unwrap_err();
            assert!(matches!(
                err,
                ComparisonError::Malformed { line_number: 2, .. }
            ));
        }

        #[test]
        fn equivalent_line_without_hash_ignored() {
            let entries = parse_cherry_output("-\n+ abc123\n").unwrap();
            assert_eq!(entries.len(), 1);
        }
    }

    mod invocation {
        use super::*;

        #[test]
        fn argument_order_is_branch_then_base() {
            assert_eq!(
                GitCherry::arguments("feature", "main"),
                ["cherry", "-v", "feature", "main"]
            );
        }

        #[test]
        fn display_includes_arguments() {
            let invocation = Invocation {
                program: "git".into(),
                args: GitCherry::arguments("feature", "main"),
            };
            assert_eq!(invocation.to_string(), "git cherry -v feature main");
        }
    }

    #[cfg(unix)]
    mod process {
        use super::*;
        use std::os::unix::fs::PermissionsExt;
        use tempfile::TempDir;

        fn script(dir: &TempDir, body: &str) -> String {
            let path = dir.path().join("fake-git");
            std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path.to_string_lossy().into_owned()
        }

        #[test]
        fn captures_stdout() {
            let dir = TempDir::new().unwrap();
            let program = script(&dir, "echo \"+ abc123 $3 vs $4\"");

            let output = GitCherry::new(program)
                .compare(dir.path(), "feature", "main")
                .unwrap();
            assert_eq!(output.trim(), "+ abc123 feature vs main");
        }

        #[test]
        fn nonzero_exit_is_failure_with_arguments() {
            let dir = TempDir::new().unwrap();
            let program = script(&dir, "echo 'fatal: unknown commit' >&2\nexit 128");

            let err = GitCherry::new(program)
                .compare(dir.path(), "feature", "main")
                .unwrap_err();

            let message = err.to_string();
            assert!(matches!(err, ComparisonError::Failed { .. }));
            assert!(message.contains("cherry -v feature main"));
            assert!(message.contains("unknown commit"));
        }

        #[test]
        fn missing_program_is_unavailable() {
            let dir = TempDir::new().unwrap();
            let err = GitCherry::new(dir.path().join("no-such-git").to_string_lossy())
                .compare(dir.path(), "feature", "main")
                .unwrap_err();
            assert!(matches!(err, ComparisonError::Unavailable { .. }));
        }

        #[test]
        fn slow_program_times_out() {
            let dir = TempDir::new().unwrap();
            let program = script(&dir, "sleep 5");

            let started = Instant::now();
            let err = GitCherry::new(program)
                .with_timeout(Some(Duration::from_millis(100)))
                .compare(dir.path(), "feature", "main")
                .unwrap_err();

            assert!(matches!(err, ComparisonError::TimedOut { .. }));
            assert!(started.elapsed() < Duration::from_secs(5));
        }

        #[test]
        fn large_output_does_not_stall() {
            let dir = TempDir::new().unwrap();
            let program = script(
                &dir,
                "i=0; while [ $i -lt 5000 ]; do echo \"+ abcdef0123456789abcdef0123456789abcdef01 commit $i\"; i=$((i+1)); done",
            );

            let output = GitCherry::new(program)
                .with_timeout(Some(Duration::from_secs(30)))
                .compare(dir.path(), "feature", "main")
                .unwrap();
            assert_eq!(parse_cherry_output(&output).unwrap().len(), 5000);
        }
    }
}
