//! CLI module for the shtest harness
//!
//! ## Commands
//!
//! - `run [SUITE_DIRS...]` - Load, discover, and execute suites
//! - `list <SUITE_DIR>` - Discovery only: print matched test files
//! - `config <SUITE_DIR>` - Load and finalize a suite, print the effective config
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    /// All suites ran and passed.
    pub const SUCCESS: ExitCode = ExitCode(0);
    /// A suite failed or could not be configured.
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Declarative shell-test suite harness
#[derive(Parser, Debug)]
#[command(name = "shtest")]
#[command(version = VERSION)]
#[command(about = "Declarative shell-test suite harness", long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load, discover, and execute test suites
    Run {
        /// Suite directories (each containing a suite.toml)
        #[arg(value_name = "SUITE_DIR", default_value = ".")]
        suite_dirs: Vec<PathBuf>,
        /// Verbose output (per-test timing)
        #[arg(short, long)]
        verbose: bool,
        /// Stop each suite on its first failure
        #[arg(short = 'x', long = "exitfirst")]
        stop_on_fail: bool,
        /// Only run tests whose path contains this substring
        #[arg(short = 'k', value_name = "SUBSTR")]
        filter: Option<String>,
    },

    /// Print the test files a suite would discover, without running them
    List {
        /// Suite directory (containing a suite.toml)
        #[arg(value_name = "SUITE_DIR", default_value = ".")]
        suite_dir: PathBuf,
    },

    /// Validate a suite fragment and print the effective configuration
    Config {
        /// Suite directory (containing a suite.toml)
        #[arg(value_name = "SUITE_DIR", default_value = ".")]
        suite_dir: PathBuf,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Run {
            suite_dirs,
            verbose,
            stop_on_fail,
            filter,
        } => commands::run_suites(&suite_dirs, verbose, stop_on_fail, filter.as_deref()),
        Command::List { suite_dir } => commands::list_suite(&suite_dir),
        Command::Config { suite_dir } => commands::show_config(&suite_dir),
    }
}
