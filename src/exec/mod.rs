//! Test execution
//!
//! ## Modules
//!
//! - `substitution` - Ordered command-line macro expansion
//! - `format` - The `TestFormat` seam and the built-in shell format
//! - `runner` - Per-suite orchestration (discover → execute → tally)
//! - `reporter` - The `TestReporter` seam and the console reporter

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod format;
pub mod reporter;
pub mod runner;
pub mod substitution;

pub use format::{RunnerError, ShellTest, TestFormat, TestOutcome};
pub use reporter::{ConsoleReporter, SilentReporter, TestReporter};
pub use runner::{RunOptions, SuiteError, Summary, run_suite, run_suite_with};
pub use substitution::Substitutions;
