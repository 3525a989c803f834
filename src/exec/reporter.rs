//! Test result reporting
//!
//! The runner talks to a `TestReporter` so output format is separate from
//! execution. The default `ConsoleReporter` prints one status line per test
//! and a colored summary banner; implement the trait for other formats
//! (JSON, TAP, etc.).

use std::path::Path;

use super::format::TestOutcome;
use super::runner::Summary;

/// Callbacks for the phases of a suite run.
pub trait TestReporter {
    /// Called once after discovery, before any test runs.
    fn on_collection_complete(&mut self, suite: &str, test_count: usize);

    /// Called before a test file executes.
    fn on_test_start(&mut self, _test_file: &Path) {}

    /// Called with the outcome of one test file.
    fn on_test_complete(&mut self, test_file: &Path, outcome: &TestOutcome);

    /// Called once after the whole suite has run.
    fn on_run_complete(&mut self, summary: &Summary);
}

/// Default console reporter.
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    /// Print per-command timing and failure detail inline.
    pub verbose: bool,
}

impl ConsoleReporter {
    /// Console reporter; `verbose` adds timing to each status line.
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    fn status_label(&self, outcome: &TestOutcome) -> String {
        match outcome {
            TestOutcome::Passed(d) => {
                if self.verbose {
                    format!("\x1b[32mPASS\x1b[0m ({:.0}ms)", d.as_millis())
                } else {
                    "\x1b[32mPASS\x1b[0m".to_string()
                }
            }
            TestOutcome::Failed(d, _) => {
                if self.verbose {
                    format!("\x1b[31mFAIL\x1b[0m ({:.0}ms)", d.as_millis())
                } else {
                    "\x1b[31mFAIL\x1b[0m".to_string()
                }
            }
            TestOutcome::XFailed(_) => "\x1b[33mXFAIL\x1b[0m".to_string(),
            TestOutcome::XPassed(_) => "\x1b[31mXPASS\x1b[0m".to_string(),
            TestOutcome::Unresolved(_) => "\x1b[31mUNRESOLVED\x1b[0m".to_string(),
        }
    }
}

impl TestReporter for ConsoleReporter {
    fn on_collection_complete(&mut self, suite: &str, test_count: usize) {
        if test_count == 0 {
            eprintln!("{suite}: no tests collected");
        } else {
            println!("{suite}: collected {test_count} test(s)");
        }
    }

    fn on_test_complete(&mut self, test_file: &Path, outcome: &TestOutcome) {
        println!("{} {}", self.status_label(outcome), test_file.display());

        match outcome {
            TestOutcome::Failed(_, detail) => {
                for line in detail.lines() {
                    println!("    {line}");
                }
            }
            TestOutcome::Unresolved(reason) => {
                println!("    {reason}");
            }
            TestOutcome::XPassed(_) => {
                println!("    test passed but was expected to fail (XFAIL)");
            }
            _ => {}
        }
    }

    fn on_run_complete(&mut self, summary: &Summary) {
        let mut parts = Vec::new();
        if summary.passed > 0 {
            parts.push(format!("{} passed", summary.passed));
        }
        if summary.failed > 0 {
            parts.push(format!("{} failed", summary.failed));
        }
        if summary.xfailed > 0 {
            parts.push(format!("{} xfailed", summary.xfailed));
        }
        if summary.xpassed > 0 {
            parts.push(format!("{} xpassed", summary.xpassed));
        }
        if summary.unresolved > 0 {
            parts.push(format!("{} unresolved", summary.unresolved));
        }
        if parts.is_empty() {
            parts.push("no tests run".to_string());
        }

        let color = if summary.is_failure() { "\x1b[1;31m" } else { "\x1b[1;32m" };
        println!(
            "{color}====== {} in {:.2}s ======\x1b[0m",
            parts.join(", "),
            summary.duration.as_secs_f64()
        );
    }
}

/// Reporter that records callbacks without printing. Used by tests and by
/// callers that only want the summary.
#[derive(Debug, Default)]
pub struct SilentReporter;

impl TestReporter for SilentReporter {
    fn on_collection_complete(&mut self, _suite: &str, _test_count: usize) {}

    fn on_test_complete(&mut self, _test_file: &Path, _outcome: &TestOutcome) {}

    fn on_run_complete(&mut self, _summary: &Summary) {}
}
