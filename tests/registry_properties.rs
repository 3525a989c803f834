//! Property-based tests for suite registration
//!
//! These tests use proptest to verify registry invariants across many
//! randomly generated registration sequences.

use std::collections::HashSet;
use std::path::PathBuf;

use proptest::prelude::*;
use shtest::{SuiteRegistry, TestFormatKind};

fn suite_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_-]{0,15}"
}

fn suffix() -> impl Strategy<Value = String> {
    "\\.[a-z]{1,6}"
}

fn substitution_pattern() -> impl Strategy<Value = String> {
    "%[a-z]{1,10}"
}

fn format_kind() -> impl Strategy<Value = TestFormatKind> {
    prop_oneof![Just(TestFormatKind::Shell), Just(TestFormatKind::Custom)]
}

proptest! {
    /// Any valid registration sequence finalizes, and the snapshot holds
    /// exactly the registered values.
    #[test]
    fn finalize_reflects_registered_values(
        name in suite_name(),
        format in format_kind(),
        suffixes in proptest::collection::vec(suffix(), 0..8),
        patterns in proptest::collection::hash_set(substitution_pattern(), 0..8),
        source_root in "[a-z/]{1,20}",
        exec_root in proptest::option::of("[a-z/]{1,20}"),
    ) {
        let mut registry = SuiteRegistry::new();
        registry.set_name(&name).unwrap();
        registry.set_format(format);
        for s in &suffixes {
            registry.add_suffix(s).unwrap();
        }
        registry.set_source_root(&source_root);
        if let Some(er) = &exec_root {
            registry.set_exec_root(er);
        }
        for (i, p) in patterns.iter().enumerate() {
            registry.add_substitution(p, &format!("replacement-{i}")).unwrap();
        }

        let config = registry.finalize().unwrap();
        prop_assert_eq!(&config.name, &name);
        prop_assert_eq!(config.format, format);
        prop_assert_eq!(&config.source_root, &PathBuf::from(&source_root));
        match &exec_root {
            Some(er) => prop_assert_eq!(&config.exec_root, &PathBuf::from(er)),
            None => prop_assert_eq!(&config.exec_root, &config.source_root),
        }
        prop_assert_eq!(config.substitutions.len(), patterns.len());

        // The suffix list is the input de-duplicated, order preserved
        let mut seen = HashSet::new();
        let expected: Vec<String> = suffixes
            .iter()
            .filter(|s| seen.insert(s.as_str()))
            .cloned()
            .collect();
        prop_assert_eq!(config.suffixes, expected);
    }

    /// Registering the same suffix any number of times yields one entry.
    #[test]
    fn duplicate_suffix_adds_are_idempotent(s in suffix(), n in 1usize..10) {
        let mut registry = SuiteRegistry::new();
        registry.set_name("dup").unwrap();
        registry.set_format(TestFormatKind::Shell);
        registry.set_source_root("/tests");
        for _ in 0..n {
            registry.add_suffix(&s).unwrap();
        }
        let config = registry.finalize().unwrap();
        prop_assert_eq!(config.suffixes, vec![s]);
    }

    /// Re-registering an identical substitution pair never errors; a
    /// different replacement for a registered pattern always does.
    #[test]
    fn substitution_conflicts_are_detected(
        pattern in substitution_pattern(),
        replacement in "[a-z ./]{1,20}",
        other in "[A-Z]{1,10}",
    ) {
        let mut registry = SuiteRegistry::new();
        registry.set_name("conflict").unwrap();
        registry.set_format(TestFormatKind::Shell);
        registry.set_source_root("/tests");

        registry.add_substitution(&pattern, &replacement).unwrap();
        prop_assert!(registry.add_substitution(&pattern, &replacement).is_ok());
        // `other` draws from a disjoint alphabet, so it always differs
        prop_assert!(registry.add_substitution(&pattern, &other).is_err());

        let config = registry.finalize().unwrap();
        prop_assert_eq!(config.substitutions, vec![(pattern, replacement)]);
    }
}
