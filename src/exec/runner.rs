//! Per-suite orchestration
//!
//! `run_suite` takes a finalized `SuiteConfig` by reference (the snapshot is
//! never mutated here), discovers its test files, executes each through the
//! suite's format, and tallies a `Summary`. Execution is sequential; the
//! exec root's output directory is created on demand before the first test.

use std::fs;
use std::time::Instant;

use thiserror::Error;
use tracing::info;

use crate::suite::discovery::{PathError, discover};
use crate::suite::registry::{SuiteConfig, TestFormatKind};

use super::format::{RunnerError, ShellTest, TestFormat, TestOutcome};
use super::reporter::TestReporter;
use super::substitution::Substitutions;

/// Options carried from the CLI into a suite run.
#[derive(Debug, Default, Clone)]
pub struct RunOptions {
    /// Only run tests whose path contains this substring.
    pub filter: Option<String>,
    /// Abort the suite after the first failing test.
    pub stop_on_fail: bool,
}

/// Tally of one suite run.
#[derive(Debug)]
pub struct Summary {
    /// Tests executed (after filtering).
    pub total: usize,
    /// Tests whose RUN commands all exited 0.
    pub passed: usize,
    /// Tests with a failing RUN command.
    pub failed: usize,
    /// Expected failures.
    pub xfailed: usize,
    /// Unexpected passes.
    pub xpassed: usize,
    /// Tests that could not be executed.
    pub unresolved: usize,
    /// Wall-clock time for the whole run, discovery included.
    pub duration: std::time::Duration,
}

impl Summary {
    /// Whether the run as a whole should be reported as failed.
    pub fn is_failure(&self) -> bool {
        self.failed > 0 || self.xpassed > 0 || self.unresolved > 0
    }
}

/// A suite run that could not proceed, as opposed to one with failing tests.
#[derive(Debug, Error)]
pub enum SuiteError {
    /// Discovery failed.
    #[error(transparent)]
    Path(#[from] PathError),

    /// Execution infrastructure failed.
    #[error(transparent)]
    Runner(#[from] RunnerError),
}

/// Run a suite with its configured format.
///
/// `custom`-format suites have no built-in executor and fail with
/// [`RunnerError::UnsupportedFormat`]; use [`run_suite_with`] to supply one.
pub fn run_suite(
    config: &SuiteConfig,
    reporter: &mut dyn TestReporter,
    options: &RunOptions,
) -> Result<Summary, SuiteError> {
    match config.format {
        TestFormatKind::Shell => {
            let format = ShellTest::new(&config.exec_root);
            run_suite_with(config, &format, reporter, options)
        }
        TestFormatKind::Custom => Err(RunnerError::UnsupportedFormat {
            format: config.format.to_string(),
        }
        .into()),
    }
}

/// Run a suite through an explicit format implementation.
pub fn run_suite_with(
    config: &SuiteConfig,
    format: &dyn TestFormat,
    reporter: &mut dyn TestReporter,
    options: &RunOptions,
) -> Result<Summary, SuiteError> {
    let start = Instant::now();

    let mut files = discover(config)?;
    if let Some(filter) = &options.filter {
        files.retain(|path| path.to_string_lossy().contains(filter.as_str()));
    }
    reporter.on_collection_complete(&config.name, files.len());

    if !files.is_empty() {
        ensure_exec_root(config)?;
    }

    let mut summary = Summary {
        total: files.len(),
        passed: 0,
        failed: 0,
        xfailed: 0,
        xpassed: 0,
        unresolved: 0,
        duration: start.elapsed(),
    };

    for (index, test_file) in files.iter().enumerate() {
        reporter.on_test_start(test_file);
        let subs = Substitutions::for_test(config, test_file);
        let outcome = format.execute(test_file, &subs);

        match outcome {
            TestOutcome::Passed(_) => summary.passed += 1,
            TestOutcome::Failed(..) => summary.failed += 1,
            TestOutcome::XFailed(_) => summary.xfailed += 1,
            TestOutcome::XPassed(_) => summary.xpassed += 1,
            TestOutcome::Unresolved(_) => summary.unresolved += 1,
        }

        let stop = options.stop_on_fail && outcome.is_failure();
        reporter.on_test_complete(test_file, &outcome);
        if stop {
            summary.total = index + 1;
            break;
        }
    }

    summary.duration = start.elapsed();
    info!(
        suite = %config.name,
        passed = summary.passed,
        failed = summary.failed,
        "suite run complete"
    );
    reporter.on_run_complete(&summary);
    Ok(summary)
}

/// Create the artifact directory `%t`/`%T` point into.
fn ensure_exec_root(config: &SuiteConfig) -> Result<(), RunnerError> {
    let output_dir = Substitutions::suite_output_dir(config);
    fs::create_dir_all(&output_dir).map_err(|source| RunnerError::ExecRoot {
        path: output_dir,
        source,
    })
}
