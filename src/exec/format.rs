//! Test execution formats
//!
//! `TestFormat` is the seam between the harness and whatever actually runs a
//! test file. The built-in `ShellTest` format implements the classic
//! directive convention: every `RUN:` line in the file is a shell command,
//! expanded through the substitution table and executed with the exec root as
//! working directory. An `XFAIL:` directive inverts the expectation.
//!
//! Suites registered with the `custom` format tag carry no built-in
//! implementation; executing them requires a host-provided `TestFormat`.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::debug;

use super::substitution::Substitutions;

/// Marker for executable directives in shell-format test files.
const RUN_DIRECTIVE: &str = "RUN:";
/// Marker inverting the pass/fail expectation.
const XFAIL_DIRECTIVE: &str = "XFAIL:";

/// Result of running a single test file.
#[derive(Debug)]
pub enum TestOutcome {
    /// Every RUN command exited 0.
    Passed(Duration),
    /// A RUN command failed; carries the failure detail.
    Failed(Duration, String),
    /// A RUN command failed in a file marked `XFAIL:`.
    XFailed(Duration),
    /// Every RUN command passed in a file marked `XFAIL:`. Counts as a
    /// failure: the expectation was wrong.
    XPassed(Duration),
    /// The file could not be executed at all (unreadable, no RUN lines,
    /// shell spawn failure).
    Unresolved(String),
}

impl TestOutcome {
    /// Whether this outcome should fail the suite run.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(..) | Self::XPassed(_) | Self::Unresolved(_))
    }
}

/// Execution-infrastructure failures, distinct from individual test failures.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// The suite's format tag has no executor in this process.
    #[error("no executor available for format '{format}'")]
    UnsupportedFormat {
        /// The offending format tag.
        format: String,
    },

    /// The exec root (or its per-suite output directory) could not be created.
    #[error("cannot create exec root '{}': {source}", path.display())]
    ExecRoot {
        /// The directory that failed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Strategy for turning one discovered file into a test outcome.
///
/// The substitution table is assembled per test by the runner; the format
/// only decides what the file's contents mean and how to execute them.
pub trait TestFormat {
    /// Execute one test file.
    fn execute(&self, test_file: &Path, subs: &Substitutions) -> TestOutcome;
}

/// Directives extracted from one shell-format test file.
#[derive(Debug, PartialEq, Eq)]
struct Directives {
    run_lines: Vec<String>,
    expect_failure: bool,
}

/// The built-in shell format.
#[derive(Debug)]
pub struct ShellTest {
    /// Working directory for every RUN command.
    pub exec_root: PathBuf,
}

impl ShellTest {
    /// Shell format rooted at the suite's exec root.
    pub fn new(exec_root: impl Into<PathBuf>) -> Self {
        Self {
            exec_root: exec_root.into(),
        }
    }

    /// Pull `RUN:` and `XFAIL:` directives out of a test file's text.
    ///
    /// A RUN line ending in `\` continues on the next RUN line, as in the
    /// classic directive convention.
    fn extract_directives(source: &str) -> Directives {
        let mut run_lines: Vec<String> = Vec::new();
        let mut expect_failure = false;
        let mut continuing = false;

        for line in source.lines() {
            if let Some(idx) = line.find(RUN_DIRECTIVE) {
                let text = line[idx + RUN_DIRECTIVE.len()..].trim();
                let (text, continues) = match text.strip_suffix('\\') {
                    Some(stripped) => (stripped.trim_end(), true),
                    None => (text, false),
                };

                if continuing {
                    if let Some(last) = run_lines.last_mut() {
                        last.push(' ');
                        last.push_str(text);
                    }
                } else if !text.is_empty() {
                    run_lines.push(text.to_string());
                }
                continuing = continues;
            } else if line.contains(XFAIL_DIRECTIVE) {
                expect_failure = true;
            }
        }

        Directives {
            run_lines,
            expect_failure,
        }
    }

    /// Run one expanded command line, returning the failure detail if any.
    fn run_command(&self, command: &str) -> Result<Option<String>, String> {
        debug!(%command, "running");
        let output = Command::new("sh")
            .arg("-c")
            .arg(command)
            .current_dir(&self.exec_root)
            .output()
            .map_err(|e| format!("failed to spawn shell: {e}"))?;

        if output.status.success() {
            return Ok(None);
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let exit = output
            .status
            .code()
            .map_or_else(|| "signal".to_string(), |c| c.to_string());
        Ok(Some(format!("command failed (exit {exit}): {command}\n{}", stderr.trim_end())))
    }
}

impl TestFormat for ShellTest {
    fn execute(&self, test_file: &Path, subs: &Substitutions) -> TestOutcome {
        let start = Instant::now();

        let source = match fs::read_to_string(test_file) {
            Ok(s) => s,
            Err(e) => return TestOutcome::Unresolved(format!("failed to read test file: {e}")),
        };

        let directives = Self::extract_directives(&source);
        if directives.run_lines.is_empty() {
            return TestOutcome::Unresolved(format!("no {RUN_DIRECTIVE} lines in test file"));
        }

        let mut failure: Option<String> = None;
        for line in &directives.run_lines {
            let command = subs.expand(line);
            match self.run_command(&command) {
                Ok(None) => {}
                Ok(Some(detail)) => {
                    failure = Some(detail);
                    break;
                }
                Err(infra) => return TestOutcome::Unresolved(infra),
            }
        }

        let duration = start.elapsed();
        match (failure, directives.expect_failure) {
            (None, false) => TestOutcome::Passed(duration),
            (None, true) => TestOutcome::XPassed(duration),
            (Some(_), true) => TestOutcome::XFailed(duration),
            (Some(detail), false) => TestOutcome::Failed(duration, detail),
        }
    }
}
