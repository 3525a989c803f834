#![forbid(unsafe_code)]
//! shtest — a declarative shell-test suite harness
//!
//! A suite of test files is registered declaratively (name, execution format,
//! file-suffix filters, source and exec roots, command-line substitutions),
//! discovered by walking the source root, and executed by expanding `RUN:`
//! directives through a substitution table and handing the result to a shell.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli`, `suite`, and `exec`
//!   modules enforce `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **True invariants**: If a panic represents a harness bug (logic error), use `.expect("INVARIANT: reason")` with a
//!   clear explanation.

pub mod cli;
pub mod exec;
pub mod suite;

pub use exec::format::{RunnerError, ShellTest, TestFormat, TestOutcome};
pub use exec::reporter::{ConsoleReporter, SilentReporter, TestReporter};
pub use exec::runner::{RunOptions, SuiteError, Summary, run_suite, run_suite_with};
pub use exec::substitution::Substitutions;
pub use suite::discovery::{PathError, discover};
pub use suite::loader::{LoadError, SUITE_FILE, load_suite};
pub use suite::registry::{ConfigError, SuiteConfig, SuiteRegistry, TestFormatKind};
