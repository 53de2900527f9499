//! [`TestWorkspace`] builder for package-tree test scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tempfile::TempDir;

/// A temporary directory holding packages, with helpers to lay out
/// descriptors, local configs, installs and symlinks.
///
/// All `rel` arguments are relative to the workspace root.
///
/// # Example
///
/// ```rust
/// use graft_test_utils::TestWorkspace;
/// use serde_json::json;
///
/// let ws = TestWorkspace::new();
/// ws.package("app", "app", &["dep"]);
/// ws.package("app/node_modules/dep", "dep", &[]);
/// ws.config("app/node_modules/dep", json!({"Listen": {"Port": 9999}}));
/// assert!(ws.path("app/node_modules/dep/config.json").is_file());
/// ```
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorkspace {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Canonical root of the workspace.
    ///
    /// Canonical so that comparisons against resolved package paths hold on
    /// platforms where the temp dir itself sits behind a symlink.
    pub fn root(&self) -> PathBuf {
        dunce::canonicalize(self.temp_dir.path()).unwrap()
    }

    /// Absolute path of `rel`.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    /// Write `value` as pretty JSON to `rel`, creating parent directories.
    pub fn write_json(&self, rel: &str, value: &Value) -> PathBuf {
        self.write(rel, &serde_json::to_string_pretty(value).unwrap())
    }

    /// Write raw text to `rel`, creating parent directories.
    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Create a package at `rel` named `name`, declaring `deps` in its
    /// settings block as a list.
    pub fn package(&self, rel: &str, name: &str, deps: &[&str]) -> PathBuf {
        self.manifest(
            rel,
            json!({
                "name": name,
                "graft": { "packageDependencies": deps }
            }),
        )
    }

    /// Write an arbitrary descriptor for the package at `rel`.
    pub fn manifest(&self, rel: &str, manifest: Value) -> PathBuf {
        self.write_json(&format!("{rel}/package.json"), &manifest);
        self.path(rel)
    }

    /// Write the local `config.json` of the package at `rel`.
    pub fn config(&self, rel: &str, config: Value) -> PathBuf {
        self.write_json(&format!("{rel}/config.json"), &config)
    }

    /// Create a directory symlink at `link` pointing to `target`.
    pub fn symlink_dir(&self, target: &str, link: &str) -> PathBuf {
        let target = self.path(target);
        let link = self.path(link);
        if let Some(parent) = link.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        symlink_dir(&target, &link);
        link
    }

    /// Canonical path of `rel`, resolving symlinks.
    pub fn real(&self, rel: &str) -> PathBuf {
        dunce::canonicalize(self.path(rel)).unwrap()
    }
}

#[cfg(unix)]
fn symlink_dir(target: &Path, link: &Path) {
    std::os::unix::fs::symlink(target, link).unwrap();
}

#[cfg(windows)]
fn symlink_dir(target: &Path, link: &Path) {
    std::os::windows::fs::symlink_dir(target, link).unwrap();
}
