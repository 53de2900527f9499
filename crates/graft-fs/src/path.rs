//! Real-path resolution and package key validation

use std::path::{Component, Path, PathBuf};

use crate::{Error, Result};

/// Resolve `path` to its canonical, symlink-free absolute form.
///
/// Uses `dunce` so Windows paths come back without the `\\?\` prefix and
/// compare equal to paths built by hand.
pub fn real_path(path: &Path) -> Result<PathBuf> {
    dunce::canonicalize(path).map_err(|e| Error::io(path, e))
}

/// Check that a dependency key is a plain relative path.
///
/// Keys such as `left-pad` or `@scope/name` are accepted. Empty keys,
/// absolute paths and keys containing `.` or `..` components are rejected
/// because they would resolve outside the dependency directory.
pub fn validate_relative_key(key: &str) -> bool {
    if key.is_empty() {
        return false;
    }
    let path = Path::new(key);
    if path.has_root() {
        return false;
    }
    path.components().all(|c| matches!(c, Component::Normal(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    #[case("left-pad", true)]
    #[case("@scope/name", true)]
    #[case("", false)]
    #[case("../escape", false)]
    #[case("a/../b", false)]
    #[case("./here", false)]
    #[case("/abs", false)]
    fn relative_key_validation(#[case] key: &str, #[case] expected: bool) {
        assert_eq!(validate_relative_key(key), expected, "key: {key:?}");
    }

    #[test]
    fn real_path_of_missing_dir_is_not_found() {
        let temp = TempDir::new().unwrap();
        let err = real_path(&temp.path().join("absent")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[cfg(unix)]
    #[test]
    fn real_path_follows_symlinks() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("target");
        std::fs::create_dir(&target).unwrap();
        let link = temp.path().join("link");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        assert_eq!(real_path(&link).unwrap(), real_path(&target).unwrap());
    }
}
