//! Suite configuration and discovery
//!
//! ## Modules
//!
//! - `registry` - Declarative suite registration (`SuiteRegistry` → `SuiteConfig`)
//! - `loader` - `suite.toml` fragment loading, replayed through the registry
//! - `discovery` - Suffix-filtered walk of a suite's source root
//!
//! ## Design
//!
//! Configuration is built once per process by a single caller, then finalized
//! into an immutable `SuiteConfig` snapshot. Nothing here performs I/O except
//! the loader (which reads the fragment) and discovery (which walks the tree);
//! the registry itself is pure in-memory field storage.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod discovery;
pub mod loader;
pub mod registry;

pub use discovery::{PathError, discover};
pub use loader::{LoadError, SUITE_FILE, load_suite};
pub use registry::{ConfigError, SuiteConfig, SuiteRegistry, TestFormatKind};
