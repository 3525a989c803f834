//! Command-line substitution expansion
//!
//! Each RUN line passes through an ordered substitution table before it
//! reaches the shell. The table holds the suite-registered pairs first, in
//! registration order, followed by the built-in path macros:
//!
//! | Macro | Expands to |
//! |-------|------------|
//! | `%%`  | a literal `%` |
//! | `%s`  | the test file's path |
//! | `%S`  | the test file's directory |
//! | `%t`  | a per-test temp output path under the exec root |
//! | `%T`  | the per-test output directory |
//!
//! Expansion is a single left-to-right scan. At each position the patterns
//! are tried in table order and the first match wins, so an earlier
//! registration shadows later overlapping ones. Replacements are not
//! rescanned.

use std::path::{Path, PathBuf};

use crate::suite::registry::SuiteConfig;

/// Name of the per-suite artifact directory under the exec root.
const OUTPUT_DIR: &str = "Output";

/// The fully assembled substitution table for one test file.
#[derive(Debug, Clone)]
pub struct Substitutions {
    table: Vec<(String, String)>,
}

impl Substitutions {
    /// The per-suite artifact directory under the exec root. `%t` and `%T`
    /// point into it; the runner creates it before executing anything.
    pub fn suite_output_dir(config: &SuiteConfig) -> PathBuf {
        config.exec_root.join(OUTPUT_DIR)
    }

    /// Build the table for a single test: suite-registered pairs first, then
    /// the built-in path macros.
    pub fn for_test(config: &SuiteConfig, test_file: &Path) -> Self {
        let output_dir = Self::suite_output_dir(config);
        let file_name = test_file.file_name().and_then(|n| n.to_str()).unwrap_or("test");
        let tmp_file = output_dir.join(format!("{file_name}.tmp"));
        let source_dir = test_file.parent().unwrap_or(Path::new("."));

        let mut table = config.substitutions.clone();
        table.push(("%%".to_string(), "%".to_string()));
        table.push(("%s".to_string(), test_file.display().to_string()));
        table.push(("%S".to_string(), source_dir.display().to_string()));
        table.push(("%t".to_string(), tmp_file.display().to_string()));
        table.push(("%T".to_string(), output_dir.display().to_string()));

        Self { table }
    }

    /// Expand one command line through the table.
    pub fn expand(&self, line: &str) -> String {
        let mut out = String::with_capacity(line.len());
        let mut rest = line;

        'scan: while !rest.is_empty() {
            for (pattern, replacement) in &self.table {
                if !pattern.is_empty() && rest.starts_with(pattern.as_str()) {
                    out.push_str(replacement);
                    rest = &rest[pattern.len()..];
                    continue 'scan;
                }
            }
            // No pattern matched here; copy one character and move on
            let mut chars = rest.chars();
            if let Some(ch) = chars.next() {
                out.push(ch);
                rest = chars.as_str();
            }
        }

        out
    }
}
