//! Suite fragment loading
//!
//! A suite directory declares itself with a `suite.toml` fragment:
//!
//! ```toml
//! name = "revng"
//! format = "shell"
//! suffixes = [".ll"]
//! exec_root = "build/tests"
//!
//! [[substitutions]]
//! pattern = "%revngopt"
//! replacement = "./bin/revng opt "
//! ```
//!
//! The fragment is deserialized and then replayed field-by-field through
//! `SuiteRegistry`, so file-loaded configurations pass through exactly the
//! same validation as programmatic ones. `source_root` defaults to the
//! directory containing the fragment; relative paths resolve against it.

use std::fs;
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use super::registry::{ConfigError, SuiteConfig, SuiteRegistry, TestFormatKind};

/// Well-known name of the per-suite fragment file.
pub const SUITE_FILE: &str = "suite.toml";

/// Deserialized form of a `suite.toml` fragment, before validation.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuiteFragment {
    /// Suite name, required and non-empty.
    pub name: String,
    /// Format tag (`shell` or `custom`).
    pub format: String,
    /// File-extension filters, each starting with `.`.
    #[serde(default)]
    pub suffixes: Vec<String>,
    /// Directory to scan; defaults to the fragment's own directory.
    #[serde(default)]
    pub source_root: Option<PathBuf>,
    /// Artifact directory; defaults to the source root.
    #[serde(default)]
    pub exec_root: Option<PathBuf>,
    /// Ordered substitution pairs.
    #[serde(default)]
    pub substitutions: Vec<SubstitutionEntry>,
}

/// One `(pattern, replacement)` pair as written in the fragment.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubstitutionEntry {
    /// Macro text to look for in RUN lines.
    pub pattern: String,
    /// Text it expands to.
    pub replacement: String,
}

/// Failure to turn a suite directory into a finalized configuration.
#[derive(Debug, Error, Diagnostic)]
pub enum LoadError {
    /// The fragment file could not be read.
    #[error("cannot read suite fragment '{}': {source}", path.display())]
    #[diagnostic(
        code(shtest::load::io),
        help("every suite directory must contain a 'suite.toml' fragment")
    )]
    Io {
        /// Path of the fragment that failed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The fragment is not valid TOML or has unknown fields.
    #[error("malformed suite fragment '{}': {source}", path.display())]
    #[diagnostic(code(shtest::load::parse))]
    Parse {
        /// Path of the fragment that failed.
        path: PathBuf,
        /// The underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// The fragment parsed but its contents violate a registration rule.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

/// Load and finalize the suite declared in `suite_dir`.
pub fn load_suite(suite_dir: &Path) -> Result<SuiteConfig, LoadError> {
    let path = suite_dir.join(SUITE_FILE);
    let text = fs::read_to_string(&path).map_err(|source| LoadError::Io {
        path: path.clone(),
        source,
    })?;
    let fragment: SuiteFragment = toml::from_str(&text).map_err(|source| LoadError::Parse { path, source })?;

    debug!(suite = %fragment.name, dir = %suite_dir.display(), "loading suite fragment");
    let config = apply_fragment(&fragment, suite_dir)?;
    Ok(config)
}

/// Replay a parsed fragment through the registry.
///
/// Split out from `load_suite` so tests can drive fragments without touching
/// the filesystem.
pub fn apply_fragment(fragment: &SuiteFragment, suite_dir: &Path) -> Result<SuiteConfig, ConfigError> {
    let mut registry = SuiteRegistry::new();
    registry.set_name(&fragment.name)?;
    registry.set_format(TestFormatKind::parse(&fragment.format)?);
    for suffix in &fragment.suffixes {
        registry.add_suffix(suffix)?;
    }

    match &fragment.source_root {
        Some(root) => registry.set_source_root(resolve(suite_dir, root)),
        None => registry.set_source_root(suite_dir),
    }
    if let Some(exec_root) = &fragment.exec_root {
        registry.set_exec_root(resolve(suite_dir, exec_root));
    }

    for entry in &fragment.substitutions {
        registry.add_substitution(&entry.pattern, &entry.replacement)?;
    }

    registry.finalize()
}

/// Resolve a fragment path against the fragment's own directory.
fn resolve(suite_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        suite_dir.join(path)
    }
}
