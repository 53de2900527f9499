//! Paths into the static `test-fixtures/` directory.

use std::path::PathBuf;

/// Path to the test-fixtures directory at the workspace root.
pub fn fixtures_dir() -> PathBuf {
    // crates/graft-test-utils -> ../../test-fixtures
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../test-fixtures")
}

/// The `main-package` fixture root.
pub fn main_package() -> PathBuf {
    fixtures_dir().join("main-package")
}

/// The override file that accompanies `main-package`.
pub fn local_config() -> PathBuf {
    fixtures_dir().join("local-config.json")
}
