//! Declarative suite registration
//!
//! A `SuiteRegistry` accepts field assignments one at a time, validating each
//! against the already-registered state, and `finalize()` produces the
//! immutable `SuiteConfig` snapshot the discovery and execution phases read.
//!
//! An inconsistent registration (redefined name, conflicting substitution,
//! missing required field) fails synchronously with a `ConfigError`; nothing
//! is swallowed or deferred, since a wrong configuration must not silently
//! produce an empty or wrong test set.

use std::fmt;
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use thiserror::Error;

// ============================================================================
// Test format tags
// ============================================================================

/// Execution strategy for matched test files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestFormatKind {
    /// Each `RUN:` directive in the file is expanded and handed to `sh -c`.
    Shell,
    /// Execution is delegated to a host-provided `TestFormat` implementation.
    Custom,
}

impl TestFormatKind {
    /// Parse a format tag as it appears in a suite fragment.
    pub fn parse(tag: &str) -> Result<Self, ConfigError> {
        match tag {
            "shell" => Ok(Self::Shell),
            "custom" => Ok(Self::Custom),
            _ => Err(ConfigError::UnknownFormat { tag: tag.to_string() }),
        }
    }

    /// The canonical tag for this format.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Shell => "shell",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for TestFormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Configuration errors
// ============================================================================

/// Malformed or contradictory suite configuration.
///
/// Always fatal to the configuration phase; surfaced immediately, never
/// retried.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// `set_name` was called with an empty string.
    #[error("suite name may not be empty")]
    #[diagnostic(code(shtest::config::empty_name))]
    EmptyName,

    /// `set_name` was called twice with differing values.
    #[error("suite name already set to '{current}', cannot redefine as '{attempted}'")]
    #[diagnostic(
        code(shtest::config::name_redefined),
        help("a suite is registered exactly once per run; drop the second registration")
    )]
    NameRedefined {
        /// The name registered first.
        current: String,
        /// The conflicting later name.
        attempted: String,
    },

    /// A format tag that no execution strategy answers to.
    #[error("unknown test format '{tag}'")]
    #[diagnostic(code(shtest::config::unknown_format), help("supported formats: shell, custom"))]
    UnknownFormat {
        /// The unrecognized tag.
        tag: String,
    },

    /// A suffix entry that is not an extension filter.
    #[error("suffix '{suffix}' must start with '.'")]
    #[diagnostic(code(shtest::config::bad_suffix), help("write \".ll\", not \"ll\""))]
    BadSuffix {
        /// The rejected entry.
        suffix: String,
    },

    /// The same substitution pattern registered with two different replacements.
    #[error("substitution pattern '{pattern}' already registered with replacement '{existing}'")]
    #[diagnostic(
        code(shtest::config::substitution_conflict),
        help("substitutions are first-registered-wins; remove the conflicting entry '{attempted}'")
    )]
    SubstitutionConflict {
        /// The pattern registered twice.
        pattern: String,
        /// The replacement registered first.
        existing: String,
        /// The conflicting later replacement.
        attempted: String,
    },

    /// `finalize` was called before a required field was set.
    #[error("required field '{field}' was never set")]
    #[diagnostic(code(shtest::config::missing_field))]
    MissingField {
        /// Which field is missing (`name`, `format`, or `source_root`).
        field: &'static str,
    },
}

// ============================================================================
// Finalized configuration
// ============================================================================

/// Immutable snapshot of one suite's discovery configuration.
///
/// Produced by `SuiteRegistry::finalize` and never mutated afterwards; it is
/// `Clone` and free of interior mutability, so downstream consumers (including
/// parallel ones) can read it without synchronization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteConfig {
    /// Human-readable suite identifier.
    pub name: String,
    /// How each discovered test file is executed.
    pub format: TestFormatKind,
    /// File-extension filters for discovery, in registration order.
    pub suffixes: Vec<String>,
    /// Directory tree to scan for test files. Existence is validated lazily
    /// at discovery time, not here.
    pub source_root: PathBuf,
    /// Directory where execution artifacts are written; created on demand.
    pub exec_root: PathBuf,
    /// Ordered `(pattern, replacement)` pairs expanded in each test's
    /// command line. Patterns are unique; earlier registrations win on
    /// conflicting prefixes.
    pub substitutions: Vec<(String, String)>,
}

impl SuiteConfig {
    /// Whether a path passes this suite's suffix filter.
    pub fn matches(&self, path: &Path) -> bool {
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        self.suffixes.iter().any(|s| file_name.ends_with(s.as_str()))
    }
}

// ============================================================================
// Registry builder
// ============================================================================

/// Accumulates field assignments building one `SuiteConfig`.
///
/// All setters are plain in-memory stores with synchronous validation; no I/O
/// happens until discovery reads the finalized snapshot.
#[derive(Debug, Default)]
pub struct SuiteRegistry {
    name: Option<String>,
    format: Option<TestFormatKind>,
    suffixes: Vec<String>,
    source_root: Option<PathBuf>,
    exec_root: Option<PathBuf>,
    substitutions: Vec<(String, String)>,
}

impl SuiteRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the suite name.
    ///
    /// Re-setting the same name is a no-op; a differing value is a
    /// redefinition conflict.
    pub fn set_name(&mut self, name: &str) -> Result<(), ConfigError> {
        if name.is_empty() {
            return Err(ConfigError::EmptyName);
        }
        match &self.name {
            Some(current) if current != name => Err(ConfigError::NameRedefined {
                current: current.clone(),
                attempted: name.to_string(),
            }),
            Some(_) => Ok(()),
            None => {
                self.name = Some(name.to_string());
                Ok(())
            }
        }
    }

    /// Select the execution strategy for matched files.
    ///
    /// The tag is already typed here; unknown tags are rejected upstream by
    /// `TestFormatKind::parse`, which every stringly entry point goes through.
    pub fn set_format(&mut self, format: TestFormatKind) {
        self.format = Some(format);
    }

    /// Append a file-extension filter. Duplicate adds are a no-op.
    pub fn add_suffix(&mut self, suffix: &str) -> Result<(), ConfigError> {
        if !suffix.starts_with('.') {
            return Err(ConfigError::BadSuffix {
                suffix: suffix.to_string(),
            });
        }
        if !self.suffixes.iter().any(|s| s == suffix) {
            self.suffixes.push(suffix.to_string());
        }
        Ok(())
    }

    /// Store the directory tree to scan, verbatim. No existence check here.
    pub fn set_source_root(&mut self, path: impl Into<PathBuf>) {
        self.source_root = Some(path.into());
    }

    /// Store the execution-artifact directory, verbatim.
    pub fn set_exec_root(&mut self, path: impl Into<PathBuf>) {
        self.exec_root = Some(path.into());
    }

    /// Append a `(pattern, replacement)` pair to the ordered substitution
    /// list.
    ///
    /// Re-registering an identical pair is a no-op; the same pattern with a
    /// different replacement is a conflict.
    pub fn add_substitution(&mut self, pattern: &str, replacement: &str) -> Result<(), ConfigError> {
        if let Some((_, existing)) = self.substitutions.iter().find(|(p, _)| p == pattern) {
            if existing == replacement {
                return Ok(());
            }
            return Err(ConfigError::SubstitutionConflict {
                pattern: pattern.to_string(),
                existing: existing.clone(),
                attempted: replacement.to_string(),
            });
        }
        self.substitutions.push((pattern.to_string(), replacement.to_string()));
        Ok(())
    }

    /// Produce the immutable `SuiteConfig` snapshot.
    ///
    /// `name`, `format`, and `source_root` are required. `exec_root` defaults
    /// to the source root when unset.
    pub fn finalize(self) -> Result<SuiteConfig, ConfigError> {
        let name = self.name.ok_or(ConfigError::MissingField { field: "name" })?;
        let format = self.format.ok_or(ConfigError::MissingField { field: "format" })?;
        let source_root = self
            .source_root
            .ok_or(ConfigError::MissingField { field: "source_root" })?;
        let exec_root = self.exec_root.unwrap_or_else(|| source_root.clone());

        Ok(SuiteConfig {
            name,
            format,
            suffixes: self.suffixes,
            source_root,
            exec_root,
            substitutions: self.substitutions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_registry() -> SuiteRegistry {
        let mut registry = SuiteRegistry::new();
        registry.set_name("revng").unwrap();
        registry.set_format(TestFormatKind::Shell);
        registry.set_source_root("/tests");
        registry
    }

    // ========================================
    // Name registration
    // ========================================

    #[test]
    fn test_set_name_stores_value() {
        let mut registry = minimal_registry();
        registry.set_name("revng").unwrap();
        assert_eq!(registry.finalize().unwrap().name, "revng");
    }

    #[test]
    fn test_set_name_empty_rejected() {
        let mut registry = SuiteRegistry::new();
        assert!(matches!(registry.set_name(""), Err(ConfigError::EmptyName)));
    }

    #[test]
    fn test_set_name_same_value_is_noop() {
        let mut registry = minimal_registry();
        assert!(registry.set_name("revng").is_ok());
    }

    #[test]
    fn test_set_name_redefinition_rejected() {
        let mut registry = minimal_registry();
        let err = registry.set_name("other").unwrap_err();
        assert!(matches!(err, ConfigError::NameRedefined { .. }));
    }

    // ========================================
    // Format tags
    // ========================================

    #[test]
    fn test_format_parse_shell() {
        assert_eq!(TestFormatKind::parse("shell").unwrap(), TestFormatKind::Shell);
    }

    #[test]
    fn test_format_parse_custom() {
        assert_eq!(TestFormatKind::parse("custom").unwrap(), TestFormatKind::Custom);
    }

    #[test]
    fn test_format_parse_unknown_rejected() {
        let err = TestFormatKind::parse("googletest").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownFormat { tag } if tag == "googletest"));
    }

    #[test]
    fn test_format_round_trips_through_tag() {
        for format in [TestFormatKind::Shell, TestFormatKind::Custom] {
            assert_eq!(TestFormatKind::parse(format.as_str()).unwrap(), format);
        }
    }

    // ========================================
    // Suffix filters
    // ========================================

    #[test]
    fn test_add_suffix_duplicate_is_noop() {
        let mut registry = minimal_registry();
        registry.add_suffix(".ll").unwrap();
        registry.add_suffix(".ll").unwrap();
        assert_eq!(registry.finalize().unwrap().suffixes, vec![".ll".to_string()]);
    }

    #[test]
    fn test_add_suffix_without_dot_rejected() {
        let mut registry = SuiteRegistry::new();
        let err = registry.add_suffix("ll").unwrap_err();
        assert!(matches!(err, ConfigError::BadSuffix { suffix } if suffix == "ll"));
    }

    #[test]
    fn test_suffixes_preserve_registration_order() {
        let mut registry = minimal_registry();
        registry.add_suffix(".ll").unwrap();
        registry.add_suffix(".mlir").unwrap();
        assert_eq!(
            registry.finalize().unwrap().suffixes,
            vec![".ll".to_string(), ".mlir".to_string()]
        );
    }

    #[test]
    fn test_config_matches_suffix() {
        let mut registry = minimal_registry();
        registry.add_suffix(".ll").unwrap();
        let config = registry.finalize().unwrap();
        assert!(config.matches(Path::new("/tests/unreachable.ll")));
        assert!(!config.matches(Path::new("/tests/notes.txt")));
    }

    // ========================================
    // Substitutions
    // ========================================

    #[test]
    fn test_add_substitution_identical_is_noop() {
        let mut registry = minimal_registry();
        registry.add_substitution("%revngopt", "./bin/revng opt ").unwrap();
        registry.add_substitution("%revngopt", "./bin/revng opt ").unwrap();
        let config = registry.finalize().unwrap();
        assert_eq!(
            config.substitutions,
            vec![("%revngopt".to_string(), "./bin/revng opt ".to_string())]
        );
    }

    #[test]
    fn test_add_substitution_conflict_rejected() {
        let mut registry = minimal_registry();
        registry.add_substitution("%revngopt", "./bin/revng opt ").unwrap();
        let err = registry.add_substitution("%revngopt", "/usr/bin/opt ").unwrap_err();
        assert!(matches!(err, ConfigError::SubstitutionConflict { pattern, .. } if pattern == "%revngopt"));
    }

    #[test]
    fn test_substitutions_preserve_registration_order() {
        let mut registry = minimal_registry();
        registry.add_substitution("%a", "1").unwrap();
        registry.add_substitution("%b", "2").unwrap();
        registry.add_substitution("%c", "3").unwrap();
        let config = registry.finalize().unwrap();
        let patterns: Vec<&str> = config
            .substitutions
            .iter()
            .map(|(p, _)| p.as_str())
            .collect();
        assert_eq!(patterns, vec!["%a", "%b", "%c"]);
    }

    // ========================================
    // Finalize
    // ========================================

    #[test]
    fn test_finalize_without_name_rejected() {
        let mut registry = SuiteRegistry::new();
        registry.set_format(TestFormatKind::Shell);
        registry.set_source_root("/tests");
        let err = registry.finalize().unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { field: "name" }));
    }

    #[test]
    fn test_finalize_without_format_rejected() {
        let mut registry = SuiteRegistry::new();
        registry.set_name("revng").unwrap();
        registry.set_source_root("/tests");
        let err = registry.finalize().unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { field: "format" }));
    }

    #[test]
    fn test_finalize_without_source_root_rejected() {
        let mut registry = SuiteRegistry::new();
        registry.set_name("revng").unwrap();
        registry.set_format(TestFormatKind::Shell);
        let err = registry.finalize().unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { field: "source_root" }));
    }

    #[test]
    fn test_finalize_exec_root_defaults_to_source_root() {
        let config = minimal_registry().finalize().unwrap();
        assert_eq!(config.exec_root, PathBuf::from("/tests"));
    }

    #[test]
    fn test_finalize_does_not_touch_filesystem() {
        // source_root existence is validated lazily at discovery time
        let mut registry = SuiteRegistry::new();
        registry.set_name("ghost").unwrap();
        registry.set_format(TestFormatKind::Shell);
        registry.set_source_root("/definitely/not/a/real/directory");
        assert!(registry.finalize().is_ok());
    }

    #[test]
    fn test_finalize_full_scenario() {
        let mut registry = SuiteRegistry::new();
        registry.set_name("revng").unwrap();
        registry.set_format(TestFormatKind::Shell);
        registry.add_suffix(".ll").unwrap();
        registry.set_source_root("/tests");
        registry.set_exec_root("/build/tests");
        registry.add_substitution("%revngopt", "./bin/revng opt ").unwrap();

        let config = registry.finalize().unwrap();
        assert_eq!(config.name, "revng");
        assert_eq!(config.format, TestFormatKind::Shell);
        assert_eq!(config.suffixes, vec![".ll".to_string()]);
        assert_eq!(config.source_root, PathBuf::from("/tests"));
        assert_eq!(config.exec_root, PathBuf::from("/build/tests"));
        assert_eq!(
            config.substitutions,
            vec![("%revngopt".to_string(), "./bin/revng opt ".to_string())]
        );
    }
}
