//! Package graph resolution and hierarchical configuration merging
//!
//! This crate discovers the packages reachable from a root directory,
//! merges each package's local configuration into one object keyed by
//! package namespace, and applies an optional override file last.
//!
//! # Architecture
//!
//! ```text
//!                      loader
//!            (ConfigLoader / load_config)
//!                 |                 |
//!            traversal          overrides
//!           /    |     \            |
//!   manifest  resolver  merge ------+
//!       |
//!   dependency
//! ```
//!
//! - [`manifest`] reads `package.json` and derives the namespace
//! - [`dependency`] normalizes declared dependencies into ordered edges
//! - [`resolver`] finds installed dependencies and resolves symlinks
//! - [`traversal`] walks the graph depth-first, visiting each real
//!   directory once
//! - [`merge`] deep merges into the [`ResolvedConfig`] accumulator
//! - [`overrides`] applies the external override file
//!
//! # Precedence
//!
//! Later merges win. Packages are merged in pre-order, so when a package and
//! one of its dependencies set the same key in the same namespace, the
//! dependency's value wins. The override file is applied after every
//! package and always wins.
//!
//! # Example
//!
//! ```no_run
//! use graft_core::{LoaderOptions, load_config};
//!
//! let config = load_config(&LoaderOptions::new().with_cwd("."))?;
//! for namespace in config.namespaces() {
//!     println!("{namespace}");
//! }
//! # Ok::<(), graft_core::Error>(())
//! ```

pub mod dependency;
pub mod error;
pub mod loader;
pub mod manifest;
pub mod merge;
pub mod overrides;
pub mod resolver;
pub mod traversal;

/// Descriptor file marking a package directory.
pub const MANIFEST_FILENAME: &str = "package.json";

/// Descriptor key holding the package's settings block.
pub const SETTINGS_KEY: &str = "graft";

/// Per-package local configuration file.
pub const CONFIG_FILENAME: &str = "config.json";

/// Directory holding installed dependencies.
pub const MODULES_DIR: &str = "node_modules";

pub use dependency::{Dependency, DependencyEdge, PackageDependencies, extract_dependencies};
pub use error::{Error, Result};
pub use loader::{ConfigLoader, LoaderOptions, load_config, merge_package_config};
pub use manifest::{PackageDescriptor, PackageSettings, package_name, read_manifest};
pub use merge::{ResolvedConfig, deep_merge};
pub use overrides::{OverrideMode, apply_override_file, apply_overrides};
pub use resolver::{NodeModulesResolver, PackageResolver};
pub use traversal::{Traversal, VisitedPackage, collect_packages};
