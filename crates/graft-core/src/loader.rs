//! Top-level configuration loading
//!
//! [`ConfigLoader::load`] ties the pieces together:
//!
//! 1. Traverse the package graph from `cwd`, then from each extra root
//!    directory, with one shared visited set.
//! 2. For every visited package, deep merge its local `config.json` into
//!    the package's namespace.
//! 3. Apply the override file, if one was given.
//!
//! The result is either a complete [`ResolvedConfig`] or the first error;
//! no partially built configuration is ever returned.

use std::path::{Path, PathBuf};

use graft_fs::ConfigStore;
use serde_json::{Map, Value};

use crate::merge::ResolvedConfig;
use crate::overrides::{OverrideMode, apply_override_file};
use crate::resolver::{NodeModulesResolver, PackageResolver};
use crate::traversal::{Traversal, VisitedPackage};
use crate::{CONFIG_FILENAME, Error, Result};

/// Input to a configuration load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Starting package directory
    pub cwd: Option<PathBuf>,

    /// Additional root directories, traversed in order after `cwd`
    pub directories: Vec<PathBuf>,

    /// Override file applied after all package configuration; an empty
    /// path means none
    pub config_file_path: Option<PathBuf>,

    /// How override entries combine with package configuration
    pub override_mode: OverrideMode,
}

impl LoaderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn with_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.directories.push(dir.into());
        self
    }

    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file_path = Some(path.into());
        self
    }

    pub fn with_override_mode(mut self, mode: OverrideMode) -> Self {
        self.override_mode = mode;
        self
    }

    /// Build options from untyped input such as a parsed JSON object.
    ///
    /// Recognized keys: `cwd`, `directories`, `configFilePath` and
    /// `overrideMode`. `null` and `{}` are valid and describe a load that
    /// finds nothing. Wrongly typed values fail with
    /// [`Error::InvalidArgument`] before anything touches the disk.
    pub fn from_value(input: &Value) -> Result<Self> {
        let empty = Map::new();
        let fields = match input {
            Value::Null => &empty,
            Value::Object(fields) => fields,
            other => {
                return Err(Error::invalid_argument(format!(
                    "loader options must be an object, got {}",
                    type_name(other)
                )));
            }
        };

        let cwd = optional_string(fields, "cwd")?.map(PathBuf::from);
        let config_file_path = optional_string(fields, "configFilePath")?
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        let directories = match fields.get("directories") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(index, item)| match item {
                    Value::String(dir) => Ok(PathBuf::from(dir)),
                    other => Err(Error::invalid_argument(format!(
                        "`directories[{index}]` must be a string, got {}",
                        type_name(other)
                    ))),
                })
                .collect::<Result<Vec<_>>>()?,
            Some(other) => {
                return Err(Error::invalid_argument(format!(
                    "`directories` must be an array of strings, got {}",
                    type_name(other)
                )));
            }
        };

        let override_mode = match optional_string(fields, "overrideMode")? {
            Some(mode) => mode.parse()?,
            None => OverrideMode::default(),
        };

        let options = Self {
            cwd,
            directories,
            config_file_path,
            override_mode,
        };
        options.validate()?;
        Ok(options)
    }

    /// Reject empty paths.
    pub fn validate(&self) -> Result<()> {
        if self.cwd.as_ref().is_some_and(|cwd| cwd.as_os_str().is_empty()) {
            return Err(Error::invalid_argument("`cwd` must be a non-empty path"));
        }
        if let Some(index) = self
            .directories
            .iter()
            .position(|dir| dir.as_os_str().is_empty())
        {
            return Err(Error::invalid_argument(format!(
                "`directories[{index}]` must be a non-empty path"
            )));
        }
        Ok(())
    }

    /// Traversal roots in order: `cwd` first, then `directories`.
    pub fn roots(&self) -> impl Iterator<Item = &Path> {
        self.cwd
            .iter()
            .chain(self.directories.iter())
            .map(PathBuf::as_path)
    }
}

fn optional_string<'a>(fields: &'a Map<String, Value>, key: &str) -> Result<Option<&'a str>> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(Error::invalid_argument(format!(
            "`{key}` must be a string, got {}",
            type_name(other)
        ))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Deep merge a visited package's local configuration into its namespace.
///
/// A package without a local config file contributes an empty object, which
/// still registers its namespace.
pub fn merge_package_config(
    store: &ConfigStore,
    config: &mut ResolvedConfig,
    package: &VisitedPackage<'_>,
) -> Result<()> {
    let path = package.dir.join(CONFIG_FILENAME);
    let local = match store.load_optional::<Value>(&path)? {
        Some(value @ Value::Object(_)) => value,
        Some(_) => {
            return Err(Error::parse(
                &path,
                "package configuration must be an object",
            ));
        }
        None => Value::Object(Map::new()),
    };

    tracing::debug!(
        namespace = %package.descriptor.name,
        keys = local.as_object().map_or(0, Map::len),
        "merging package config"
    );
    config.merge_namespace(&package.descriptor.name, &local);
    Ok(())
}

/// Builds a [`ResolvedConfig`] from a package graph and an override file
#[derive(Debug, Default)]
pub struct ConfigLoader<R = NodeModulesResolver> {
    resolver: R,
    store: ConfigStore,
}

impl ConfigLoader<NodeModulesResolver> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: PackageResolver> ConfigLoader<R> {
    /// Use a custom dependency resolver.
    pub fn with_resolver(resolver: R) -> Self {
        Self {
            resolver,
            store: ConfigStore::new(),
        }
    }

    /// Run a full load.
    pub fn load(&self, options: &LoaderOptions) -> Result<ResolvedConfig> {
        options.validate()?;

        let mut config = ResolvedConfig::new();
        let mut traversal = Traversal::new(&self.resolver);

        for root in options.roots() {
            let root = absolute(root)?;
            let visited = traversal.walk(&root, |package| {
                merge_package_config(&self.store, &mut config, package)
            })?;
            tracing::debug!(root = %root.display(), visited, "traversed root");
        }

        let override_path = options
            .config_file_path
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty());
        if let Some(path) = override_path {
            let path = absolute(path)?;
            apply_override_file(&self.store, &mut config, &path, options.override_mode)?;
        }

        tracing::info!(
            packages = traversal.visited().len(),
            namespaces = config.len(),
            "configuration loaded"
        );
        Ok(config)
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(|e| graft_fs::Error::io(path, e).into())
}

/// Load configuration with the default resolver.
///
/// # Example
///
/// ```no_run
/// use graft_core::{LoaderOptions, load_config};
///
/// let config = load_config(
///     &LoaderOptions::new()
///         .with_cwd("/path/to/app")
///         .with_config_file("/etc/app/overrides.json"),
/// )?;
/// if let Some(port) = config.pointer("/app/Listen/Port") {
///     println!("listening on {port}");
/// }
/// # Ok::<(), graft_core::Error>(())
/// ```
pub fn load_config(options: &LoaderOptions) -> Result<ResolvedConfig> {
    ConfigLoader::new().load(options)
}
