//! Locating installed dependencies on disk
//!
//! The default [`NodeModulesResolver`] follows the nested dependency
//! directory convention: starting at the declaring package and walking up
//! to the filesystem root, look for `<ancestor>/node_modules/<key>`. The
//! first candidate holding a package descriptor wins, and is returned with
//! every symlink resolved so that one installed package is one graph node
//! no matter how it was reached.

use std::path::{Path, PathBuf};

use graft_fs::{real_path, validate_relative_key};

use crate::manifest::manifest_path;
use crate::{Error, MODULES_DIR, Result};

/// Resolves a dependency key to the real directory of the installed package.
pub trait PackageResolver {
    /// Resolve `key` as declared by the package at `declared_by`.
    ///
    /// Returns the canonical, symlink-free directory, or
    /// [`Error::DependencyNotFound`] if nothing is installed under that key.
    fn resolve(&self, key: &str, declared_by: &Path) -> Result<PathBuf>;
}

impl<R: PackageResolver + ?Sized> PackageResolver for &R {
    fn resolve(&self, key: &str, declared_by: &Path) -> Result<PathBuf> {
        (**self).resolve(key, declared_by)
    }
}

/// Nested `node_modules` lookup, nearest ancestor first.
#[derive(Debug, Default, Clone, Copy)]
pub struct NodeModulesResolver;

impl NodeModulesResolver {
    pub fn new() -> Self {
        Self
    }

    /// Every directory searched for `key`, in search order.
    ///
    /// Ancestors that are themselves a `node_modules` directory are skipped,
    /// so `a/node_modules/node_modules` is never consulted.
    pub fn candidates(&self, key: &str, declared_by: &Path) -> Vec<PathBuf> {
        declared_by
            .ancestors()
            .filter(|dir| dir.file_name().is_none_or(|name| name != MODULES_DIR))
            .map(|dir| dir.join(MODULES_DIR).join(key))
            .collect()
    }
}

impl PackageResolver for NodeModulesResolver {
    fn resolve(&self, key: &str, declared_by: &Path) -> Result<PathBuf> {
        let not_found = || Error::DependencyNotFound {
            dependency: key.to_string(),
            required_by: declared_by.to_path_buf(),
        };

        if !validate_relative_key(key) {
            tracing::debug!(key, "rejecting dependency key that is not a plain relative path");
            return Err(not_found());
        }

        for candidate in self.candidates(key, declared_by) {
            if !manifest_path(&candidate).is_file() {
                continue;
            }
            let resolved = real_path(&candidate)?;
            tracing::debug!(
                key,
                candidate = %candidate.display(),
                resolved = %resolved.display(),
                "resolved dependency"
            );
            return Ok(resolved);
        }

        Err(not_found())
    }
}
