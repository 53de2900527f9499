//! Package descriptor reading
//!
//! A directory is a package when it contains a [`MANIFEST_FILENAME`] with a
//! derivable name. The descriptor is parsed once per visit and dropped
//! once the visit is over.

use std::path::{Path, PathBuf};

use graft_fs::ConfigStore;
use serde_json::Value;

use crate::dependency::{Dependency, extract_dependencies};
use crate::{Error, MANIFEST_FILENAME, Result, SETTINGS_KEY};

/// The package's settings block (the `graft` key of the descriptor)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackageSettings {
    /// Command discovery pattern; carried but not interpreted here
    pub cli_pattern: Option<String>,

    /// Normalized `packageDependencies`
    pub package_dependencies: Vec<Dependency>,
}

impl PackageSettings {
    fn from_value(block: &Value) -> Self {
        Self {
            cli_pattern: block
                .get("cliPattern")
                .and_then(Value::as_str)
                .map(str::to_string),
            package_dependencies: extract_dependencies(block),
        }
    }
}

/// Parsed data for one package
#[derive(Debug, Clone, PartialEq)]
pub struct PackageDescriptor {
    /// Effective, lowercased name; the package's configuration namespace
    pub name: String,

    /// Path of the descriptor file this was read from
    pub manifest_path: PathBuf,

    /// The settings block, when the descriptor declares one
    pub settings: Option<PackageSettings>,

    /// Dependencies from the settings block, or from a top-level
    /// `packageDependencies` field when there is no settings block
    pub dependencies: Vec<Dependency>,
}

impl PackageDescriptor {
    /// Build a descriptor from already-parsed manifest data.
    ///
    /// Fails with [`Error::MissingName`] if no name can be derived.
    pub fn from_value(manifest_path: impl Into<PathBuf>, manifest: &Value) -> Result<Self> {
        let manifest_path = manifest_path.into();
        let Some(name) = package_name(manifest) else {
            return Err(Error::MissingName {
                path: manifest_path,
            });
        };

        let settings = manifest
            .get(SETTINGS_KEY)
            .filter(|block| block.is_object())
            .map(PackageSettings::from_value);

        let dependencies = match &settings {
            Some(settings) => settings.package_dependencies.clone(),
            None => extract_dependencies(manifest),
        };

        Ok(Self {
            name,
            manifest_path,
            settings,
            dependencies,
        })
    }
}

/// Derive a package's namespace: `namespace` if present and non-empty,
/// otherwise `name`, lowercased.
pub fn package_name(manifest: &Value) -> Option<String> {
    fn non_empty<'a>(manifest: &'a Value, key: &str) -> Option<&'a str> {
        manifest
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    non_empty(manifest, "namespace")
        .or_else(|| non_empty(manifest, "name"))
        .map(str::to_lowercase)
}

/// Path of the descriptor file inside `dir`.
pub fn manifest_path(dir: &Path) -> PathBuf {
    dir.join(MANIFEST_FILENAME)
}

/// Read the descriptor inside `dir`.
///
/// Returns `Ok(None)` when there is no descriptor file: the directory is
/// simply not a package.
pub fn read_manifest(dir: &Path) -> Result<Option<PackageDescriptor>> {
    let path = manifest_path(dir);
    let Some(raw) = ConfigStore::new().load_optional::<Value>(&path)? else {
        return Ok(None);
    };
    PackageDescriptor::from_value(path, &raw).map(Some)
}
