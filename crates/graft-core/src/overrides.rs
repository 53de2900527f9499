//! Applying an external override file on top of package configuration

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use graft_fs::ConfigStore;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::merge::ResolvedConfig;
use crate::{Error, Result};

/// How a top-level override entry combines with an existing namespace
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverrideMode {
    /// Deep merge into the namespace; override values win per key path
    #[default]
    Merge,
    /// Replace the namespace with the override value
    Replace,
}

impl fmt::Display for OverrideMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Merge => f.write_str("merge"),
            Self::Replace => f.write_str("replace"),
        }
    }
}

impl FromStr for OverrideMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "merge" => Ok(Self::Merge),
            "replace" => Ok(Self::Replace),
            other => Err(Error::invalid_argument(format!(
                "unknown override mode `{other}` (expected `merge` or `replace`)"
            ))),
        }
    }
}

/// Apply every top-level key of `overrides` to `config`.
///
/// The root must be an object; its keys are namespaces, which need not
/// belong to any discovered package.
pub fn apply_overrides(
    config: &mut ResolvedConfig,
    overrides: &Value,
    mode: OverrideMode,
    source: &Path,
) -> Result<()> {
    let Some(entries) = overrides.as_object() else {
        return Err(Error::parse(
            source,
            "override file must contain an object keyed by namespace",
        ));
    };

    for (namespace, value) in entries {
        tracing::debug!(%namespace, %mode, "applying override");
        match mode {
            OverrideMode::Merge => config.merge_namespace(namespace, value),
            OverrideMode::Replace => {
                config.insert(namespace.clone(), value.clone());
            }
        }
    }
    Ok(())
}

/// Load the override file at `path` and apply it.
///
/// A path that does not exist is not an error: no override is applied and
/// `Ok(false)` is returned.
pub fn apply_override_file(
    store: &ConfigStore,
    config: &mut ResolvedConfig,
    path: &Path,
    mode: OverrideMode,
) -> Result<bool> {
    let Some(overrides) = store.load_optional::<Value>(path)? else {
        tracing::debug!(path = %path.display(), "override file not found; skipping");
        return Ok(false);
    };
    apply_overrides(config, &overrides, mode, path)?;
    tracing::info!(path = %path.display(), %mode, "applied override file");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn base() -> ResolvedConfig {
        let mut config = ResolvedConfig::new();
        config.merge_namespace("p", &json!({"Listen": {"Port": 8080, "Url": "Some/url"}, "aKey": "aValue"}));
        config
    }

    #[test]
    fn merge_mode_keeps_unmentioned_siblings() {
        let mut config = base();
        apply_overrides(
            &mut config,
            &json!({"p": {"Listen": {"Port": 9999}}}),
            OverrideMode::Merge,
            Path::new("o.json"),
        )
        .unwrap();

        assert_eq!(
            config.get("p"),
            Some(&json!({"Listen": {"Port": 9999, "Url": "Some/url"}, "aKey": "aValue"}))
        );
    }

    #[test]
    fn replace_mode_supersedes_namespace() {
        let mut config = base();
        apply_overrides(
            &mut config,
            &json!({"p": {"value": "asdef", "Listen": {"Port": 9999}}}),
            OverrideMode::Replace,
            Path::new("o.json"),
        )
        .unwrap();

        assert_eq!(
            config.get("p"),
            Some(&json!({"value": "asdef", "Listen": {"Port": 9999}}))
        );
    }

    #[test]
    fn null_override_nulls_namespace_in_both_modes() {
        for mode in [OverrideMode::Merge, OverrideMode::Replace] {
            let mut config = base();
            apply_overrides(&mut config, &json!({"p": null}), mode, Path::new("o.json")).unwrap();
            assert_eq!(config.get("p"), Some(&Value::Null), "mode: {mode}");
        }
    }

    #[test]
    fn overrides_can_add_namespaces() {
        let mut config = base();
        apply_overrides(
            &mut config,
            &json!({"pack1": {"a": "b"}}),
            OverrideMode::Merge,
            Path::new("o.json"),
        )
        .unwrap();
        assert_eq!(config.get("pack1"), Some(&json!({"a": "b"})));
        assert!(config.contains("p"));
    }

    #[test]
    fn non_object_root_is_parse_error() {
        let mut config = base();
        let err = apply_overrides(&mut config, &json!([1, 2]), OverrideMode::Merge, Path::new("o.json"))
            .unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn missing_file_is_a_no_op() {
        let temp = TempDir::new().unwrap();
        let mut config = base();
        let applied = apply_override_file(
            &ConfigStore::new(),
            &mut config,
            &temp.path().join("absent.json"),
            OverrideMode::Merge,
        )
        .unwrap();

        assert!(!applied);
        assert_eq!(config, base());
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("override.json");
        fs::write(&path, "{ nope").unwrap();

        let err = apply_override_file(&ConfigStore::new(), &mut base(), &path, OverrideMode::Merge)
            .unwrap_err();
        match err {
            Error::Parse { path: reported, .. } => assert_eq!(reported, path),
            other => panic!("expected Parse, got {other:?}"),
        }
    }

    #[test]
    fn override_mode_parses_case_insensitively() {
        assert_eq!("Replace".parse::<OverrideMode>().unwrap(), OverrideMode::Replace);
        assert_eq!("merge".parse::<OverrideMode>().unwrap(), OverrideMode::Merge);
        assert!("append".parse::<OverrideMode>().is_err());
    }
}
