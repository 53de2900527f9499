//! Shared test utilities for the graft workspace.
//!
//! This crate provides package-tree fixtures so crate test suites do not
//! each hand-roll `package.json` and `node_modules` layouts. It is a
//! dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`workspace`] - [`TestWorkspace`] builder for package trees
//! - [`fixtures`] - the static `test-fixtures/` tree shipped with the repo

pub mod fixtures;
pub mod workspace;

pub use workspace::TestWorkspace;
