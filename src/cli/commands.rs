//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::path::{Path, PathBuf};

use miette::Report;

use crate::exec::reporter::ConsoleReporter;
use crate::exec::runner::{RunOptions, run_suite};
use crate::suite::discovery::discover;
use crate::suite::loader::load_suite;
use crate::suite::registry::SuiteConfig;

use super::{CliError, CliResult, ExitCode};

/// Run every suite directory given on the command line.
///
/// A configuration or discovery error in one suite aborts that suite and is
/// reported, but the remaining suites still run; the overall exit code is
/// non-zero if anything went wrong.
pub fn run_suites(
    suite_dirs: &[PathBuf],
    verbose: bool,
    stop_on_fail: bool,
    filter: Option<&str>,
) -> CliResult<ExitCode> {
    let options = RunOptions {
        filter: filter.map(str::to_string),
        stop_on_fail,
    };

    let mut any_failed = false;
    for suite_dir in suite_dirs {
        let config = match load_suite(suite_dir) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{:?}", Report::new(e));
                any_failed = true;
                continue;
            }
        };

        let mut reporter = ConsoleReporter::new(verbose);
        match run_suite(&config, &mut reporter, &options) {
            Ok(summary) => {
                if summary.is_failure() {
                    any_failed = true;
                }
            }
            Err(e) => {
                eprintln!("{}: {e}", config.name);
                any_failed = true;
            }
        }
    }

    if any_failed {
        // Details were already printed per suite
        Err(CliError::new("", ExitCode::FAILURE))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Print the files a suite's discovery would yield.
pub fn list_suite(suite_dir: &Path) -> CliResult<ExitCode> {
    let config = load_suite(suite_dir).map_err(|e| CliError::failure(format!("{:?}", Report::new(e))))?;
    let files = discover(&config).map_err(|e| CliError::failure(format!("{:?}", Report::new(e))))?;

    for file in &files {
        println!("{}", file.display());
    }
    eprintln!("{}: {} test file(s)", config.name, files.len());
    Ok(ExitCode::SUCCESS)
}

/// Validate a suite fragment and print the effective configuration.
///
/// This is a configuration dry-run: it exercises loading and finalization but
/// never touches the source root, so a missing source root is not an error
/// here (existence is a discovery-time check).
pub fn show_config(suite_dir: &Path) -> CliResult<ExitCode> {
    let config = load_suite(suite_dir).map_err(|e| CliError::failure(format!("{:?}", Report::new(e))))?;
    print_config(&config);
    Ok(ExitCode::SUCCESS)
}

fn print_config(config: &SuiteConfig) {
    println!("name          {}", config.name);
    println!("format        {}", config.format);
    println!("suffixes      {}", config.suffixes.join(" "));
    println!("source_root   {}", config.source_root.display());
    println!("exec_root     {}", config.exec_root.display());
    for (pattern, replacement) in &config.substitutions {
        println!("substitution  {pattern} => {replacement}");
    }
    if config.suffixes.is_empty() {
        eprintln!("warning: no suffixes registered; discovery will match nothing");
    }
}
