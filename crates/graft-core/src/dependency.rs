//! Normalization of declared package dependencies.
//!
//! Package authors declare dependencies either positionally or with
//! renaming:
//!
//! ```json
//! { "packageDependencies": ["cli-package1", "@scope/cli-package3"] }
//! { "packageDependencies": { "cli-package1": "cli-package1", "auth": "@acme/auth" } }
//! ```
//!
//! Both shapes are parsed once into [`PackageDependencies`] and flattened
//! into an ordered list of [`Dependency`] entries. Nothing downstream
//! branches on the declared shape.
//!
//! # Example
//!
//! ```
//! use graft_core::dependency::{Dependency, DependencyEdge, PackageDependencies};
//! use serde_json::json;
//!
//! let declared = PackageDependencies::from_value(&json!({"auth": "@acme/auth"}));
//! let deps = declared.into_dependencies();
//! assert_eq!(deps, vec![Dependency::Edge(DependencyEdge::aliased("auth", "@acme/auth"))]);
//! ```

use serde_json::{Map, Value};

/// A normalized `(import name, resolution key)` pair.
///
/// `resolution_key` is what the resolver looks up on disk. When the
/// declaration supplied a single identifier, both fields are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DependencyEdge {
    pub import_name: String,
    pub resolution_key: String,
}

impl DependencyEdge {
    /// An edge declared by a single identifier.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            import_name: name.clone(),
            resolution_key: name,
        }
    }

    /// An edge whose import name differs from the installed package.
    pub fn aliased(import_name: impl Into<String>, resolution_key: impl Into<String>) -> Self {
        Self {
            import_name: import_name.into(),
            resolution_key: resolution_key.into(),
        }
    }

    pub fn is_aliased(&self) -> bool {
        self.import_name != self.resolution_key
    }
}

/// One entry of a package's dependency list.
#[derive(Debug, Clone, PartialEq)]
pub enum Dependency {
    /// A resolvable edge.
    Edge(DependencyEdge),
    /// A structural entry with no identifier; carried through unresolved.
    Opaque(Value),
}

impl Dependency {
    pub fn edge(&self) -> Option<&DependencyEdge> {
        match self {
            Self::Edge(edge) => Some(edge),
            Self::Opaque(_) => None,
        }
    }
}

/// The declared `packageDependencies` value, tagged by shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PackageDependencies {
    /// Absent or of an unsupported type.
    #[default]
    None,
    /// Ordered list of identifiers (or structural entries).
    List(Vec<Value>),
    /// Mapping of alias to target, in declaration order.
    Aliases(Map<String, Value>),
}

impl PackageDependencies {
    /// Classify a raw `packageDependencies` value.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Array(items) => Self::List(items.clone()),
            Value::Object(map) => Self::Aliases(map.clone()),
            _ => Self::None,
        }
    }

    /// Flatten into the uniform ordered list.
    pub fn into_dependencies(self) -> Vec<Dependency> {
        match self {
            Self::None => Vec::new(),
            Self::List(items) => items.into_iter().map(list_entry).collect(),
            Self::Aliases(map) => map
                .into_iter()
                .map(|(alias, target)| match target {
                    Value::String(target) if target == alias => {
                        Dependency::Edge(DependencyEdge::named(alias))
                    }
                    Value::String(target) => {
                        Dependency::Edge(DependencyEdge::aliased(alias, target))
                    }
                    other => Dependency::Opaque(other),
                })
                .collect(),
        }
    }
}

/// List entries are identifiers, or `{ "key": .., "value": .. }` pairs
/// as produced when an alias mapping was previously flattened.
fn list_entry(item: Value) -> Dependency {
    match item {
        Value::String(name) => Dependency::Edge(DependencyEdge::named(name)),
        Value::Object(map) => {
            let edge = match (map.get("key"), map.get("value")) {
                (Some(Value::String(key)), Some(Value::String(value))) => {
                    Some(DependencyEdge::aliased(key.as_str(), value.as_str()))
                }
                (Some(Value::String(key)), None) => Some(DependencyEdge::named(key.as_str())),
                _ => None,
            };
            match edge {
                Some(edge) => Dependency::Edge(edge),
                None => Dependency::Opaque(Value::Object(map)),
            }
        }
        other => Dependency::Opaque(other),
    }
}

/// Extract the normalized dependency list from a settings block.
///
/// Reads the block's `packageDependencies` field; anything that is not a
/// list or a mapping yields an empty list.
pub fn extract_dependencies(settings: &Value) -> Vec<Dependency> {
    settings
        .get("packageDependencies")
        .map(PackageDependencies::from_value)
        .unwrap_or_default()
        .into_dependencies()
}
