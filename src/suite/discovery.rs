//! Test-file discovery
//!
//! Walks a suite's source root recursively, keeping files that pass the
//! suffix filter. The walk skips hidden directories, and the result is sorted
//! so repeated discoveries over an unchanged tree yield the same sequence.

use std::fs;
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use thiserror::Error;
use tracing::debug;

use super::registry::SuiteConfig;

/// A directory referenced by the configuration does not exist or cannot be
/// read at discovery time.
///
/// Fatal to the affected suite's discovery only; other suites registered in
/// the same process are untouched.
#[derive(Debug, Error, Diagnostic)]
pub enum PathError {
    /// The configured source root is missing or not a directory.
    #[error("source root '{}' does not exist", root.display())]
    #[diagnostic(
        code(shtest::path::missing_source_root),
        help("source_root is stored verbatim at registration and only checked here")
    )]
    MissingSourceRoot {
        /// The configured source root.
        root: PathBuf,
    },

    /// A directory inside the source root could not be read.
    #[error("failed to read '{}': {source}", path.display())]
    #[diagnostic(code(shtest::path::unreadable))]
    Unreadable {
        /// The directory that failed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Discover all test files for a finalized suite.
///
/// Returns the matching paths in sorted order. Fails with
/// [`PathError::MissingSourceRoot`] if the source root does not exist; the
/// configuration phase never checks this, so a bad root surfaces here.
pub fn discover(config: &SuiteConfig) -> Result<Vec<PathBuf>, PathError> {
    if !config.source_root.is_dir() {
        return Err(PathError::MissingSourceRoot {
            root: config.source_root.clone(),
        });
    }

    let mut files = Vec::new();
    walk(&config.source_root, config, &mut files)?;
    files.sort();

    debug!(suite = %config.name, count = files.len(), "discovery complete");
    Ok(files)
}

fn walk(dir: &Path, config: &SuiteConfig, out: &mut Vec<PathBuf>) -> Result<(), PathError> {
    let entries = fs::read_dir(dir).map_err(|source| PathError::Unreadable {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| PathError::Unreadable {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();

        if path.is_dir() {
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if !name.starts_with('.') {
                walk(&path, config, out)?;
            }
        } else if config.matches(&path) {
            out.push(path);
        }
    }

    Ok(())
}
