//! Tests for dependency graph traversal

use graft_core::{
    Error, NodeModulesResolver, PackageResolver, Result, Traversal, collect_packages,
};
use graft_test_utils::TestWorkspace;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::cell::Cell;
use std::path::{Path, PathBuf};

fn names(ws: &TestWorkspace, root: &str) -> Vec<String> {
    let mut visited = Vec::new();
    let mut traversal = Traversal::new(NodeModulesResolver::new());
    traversal
        .walk(&ws.path(root), |package| {
            visited.push(package.descriptor.name.clone());
            Ok(())
        })
        .unwrap();
    visited
}

#[test]
fn non_package_root_visits_nothing() {
    let ws = TestWorkspace::new();
    ws.write("plain/readme.txt", "not a package");

    let visited = collect_packages(&ws.path("plain"), NodeModulesResolver::new()).unwrap();
    assert!(visited.is_empty());

    let missing = collect_packages(&ws.path("does-not-exist"), NodeModulesResolver::new()).unwrap();
    assert!(missing.is_empty());
}

#[test]
fn visits_pre_order_in_declaration_order() {
    let ws = TestWorkspace::new();
    ws.package("app", "app", &["b", "a"]);
    ws.package("app/node_modules/b", "b", &["b-child"]);
    ws.package("app/node_modules/b/node_modules/b-child", "b-child", &[]);
    ws.package("app/node_modules/a", "a", &[]);

    assert_eq!(names(&ws, "app"), vec!["app", "b", "b-child", "a"]);
}

#[test]
fn diamond_dependency_is_visited_once() {
    let ws = TestWorkspace::new();
    ws.package("app", "app", &["left", "right"]);
    ws.package("app/node_modules/left", "left", &["shared"]);
    ws.package("app/node_modules/right", "right", &["shared"]);
    ws.package("app/node_modules/shared", "shared", &[]);

    assert_eq!(names(&ws, "app"), vec!["app", "left", "shared", "right"]);
}

#[test]
fn repeated_edges_and_cycles_terminate() {
    let ws = TestWorkspace::new();
    ws.package("app", "app", &["a", "a"]);
    ws.package("app/node_modules/a", "a", &["b"]);
    ws.package("app/node_modules/b", "b", &["a"]);

    assert_eq!(names(&ws, "app"), vec!["app", "a", "b"]);
}

#[test]
fn alias_mapping_resolves_targets_in_insertion_order() {
    let ws = TestWorkspace::new();
    ws.manifest(
        "app",
        json!({
            "name": "app",
            "graft": {
                "packageDependencies": {
                    "zed": "zed",
                    "auth": "@acme/auth-impl"
                }
            }
        }),
    );
    ws.package("app/node_modules/zed", "zed", &[]);
    ws.package("app/node_modules/@acme/auth-impl", "auth-impl", &[]);

    assert_eq!(names(&ws, "app"), vec!["app", "zed", "auth-impl"]);
}

#[test]
fn opaque_entries_are_skipped() {
    let ws = TestWorkspace::new();
    ws.manifest(
        "app",
        json!({
            "name": "app",
            "graft": { "packageDependencies": [{"path": "./local"}, "a"] }
        }),
    );
    ws.package("app/node_modules/a", "a", &[]);

    assert_eq!(names(&ws, "app"), vec!["app", "a"]);
}

#[cfg(unix)]
#[test]
fn symlinked_and_real_installs_are_one_package() {
    let ws = TestWorkspace::new();
    ws.package("app", "app", &["linked", "other"]);
    ws.package("app/node_modules/linked", "linked", &[]);
    ws.package("app/node_modules/other", "other", &["linked"]);
    // `other` sees `linked` through a symlink to the real install
    ws.symlink_dir(
        "app/node_modules/linked",
        "app/node_modules/other/node_modules/linked",
    );

    let visited = collect_packages(&ws.path("app"), NodeModulesResolver::new()).unwrap();
    assert_eq!(
        visited,
        vec![
            ws.real("app"),
            ws.real("app/node_modules/linked"),
            ws.real("app/node_modules/other"),
        ]
    );
}

#[cfg(unix)]
#[test]
fn symlinked_root_is_canonicalized() {
    let ws = TestWorkspace::new();
    ws.package("real-app", "app", &[]);
    ws.symlink_dir("real-app", "app-link");

    let visited = collect_packages(&ws.path("app-link"), NodeModulesResolver::new()).unwrap();
    assert_eq!(visited, vec![ws.real("real-app")]);
}

#[test]
fn missing_dependency_aborts_walk() {
    let ws = TestWorkspace::new();
    ws.package("app", "app", &["present", "absent"]);
    ws.package("app/node_modules/present", "present", &[]);

    let err = collect_packages(&ws.path("app"), NodeModulesResolver::new()).unwrap_err();
    match err {
        Error::DependencyNotFound {
            dependency,
            required_by,
        } => {
            assert_eq!(dependency, "absent");
            assert_eq!(required_by, ws.real("app"));
        }
        other => panic!("expected DependencyNotFound, got {other:?}"),
    }
}

#[test]
fn malformed_root_manifest_is_an_error() {
    let ws = TestWorkspace::new();
    ws.write("app/package.json", "{ broken");

    let err = collect_packages(&ws.path("app"), NodeModulesResolver::new()).unwrap_err();
    assert!(matches!(err, Error::Parse { .. }));
}

#[test]
fn dependency_without_name_is_missing_name() {
    let ws = TestWorkspace::new();
    ws.package("app", "app", &["nameless"]);
    ws.manifest("app/node_modules/nameless", json!({"version": "1.0.0"}));

    let err = collect_packages(&ws.path("app"), NodeModulesResolver::new()).unwrap_err();
    assert!(matches!(err, Error::MissingName { .. }));
}

#[test]
fn visitor_errors_abort_the_walk() {
    let ws = TestWorkspace::new();
    ws.package("app", "app", &["a"]);
    ws.package("app/node_modules/a", "a", &[]);

    let calls = Cell::new(0);
    let mut traversal = Traversal::new(NodeModulesResolver::new());
    let err = traversal
        .walk(&ws.path("app"), |_| {
            calls.set(calls.get() + 1);
            Err(Error::invalid_argument("stop"))
        })
        .unwrap_err();

    assert!(matches!(err, Error::InvalidArgument { .. }));
    assert_eq!(calls.get(), 1);
}

#[test]
fn visited_set_is_shared_across_roots_of_one_traversal() {
    let ws = TestWorkspace::new();
    ws.package("app", "app", &["shared"]);
    ws.package("app/node_modules/shared", "shared", &[]);

    let mut traversal = Traversal::new(NodeModulesResolver::new());
    let first = traversal.walk(&ws.path("app"), |_| Ok(())).unwrap();
    let second = traversal
        .walk(&ws.path("app/node_modules/shared"), |_| Ok(()))
        .unwrap();

    assert_eq!(first, 2);
    assert_eq!(second, 0);
    assert!(traversal.has_visited(&ws.real("app/node_modules/shared")));
}

#[test]
fn separate_traversals_do_not_share_state() {
    let ws = TestWorkspace::new();
    ws.package("app", "app", &[]);

    for _ in 0..2 {
        let visited = collect_packages(&ws.path("app"), NodeModulesResolver::new()).unwrap();
        assert_eq!(visited.len(), 1);
    }
}

/// Resolves every key to a fixed directory, counting lookups.
struct FixedResolver {
    target: PathBuf,
    lookups: Cell<usize>,
}

impl PackageResolver for FixedResolver {
    fn resolve(&self, _key: &str, _declared_by: &Path) -> Result<PathBuf> {
        self.lookups.set(self.lookups.get() + 1);
        Ok(self.target.clone())
    }
}

#[test]
fn custom_resolver_is_used() {
    let ws = TestWorkspace::new();
    ws.package("app", "app", &["x", "y"]);
    ws.package("elsewhere/pkg", "pkg", &[]);

    let resolver = FixedResolver {
        target: ws.real("elsewhere/pkg"),
        lookups: Cell::new(0),
    };
    let visited = collect_packages(&ws.path("app"), &resolver).unwrap();

    assert_eq!(visited, vec![ws.real("app"), ws.real("elsewhere/pkg")]);
    assert_eq!(resolver.lookups.get(), 2);
}
