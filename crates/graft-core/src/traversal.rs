//! Depth-first walk over the package dependency graph.
//!
//! Starting at a root package, every reachable package is handed to the
//! caller's visitor exactly once, in pre-order (a package before its
//! dependencies) with dependencies taken in declaration order. Identity is
//! the canonical directory, so a package reached through a symlink and
//! through a real copy of the same path is one node.
//!
//! The walk is iterative: each stack frame owns the not-yet-processed
//! dependencies of one package. A [`Traversal`] keeps its visited set for
//! its whole lifetime, so walking several roots with the same value never
//! visits a shared package twice.
//!
//! # Example
//!
//! ```no_run
//! use graft_core::resolver::NodeModulesResolver;
//! use graft_core::traversal::Traversal;
//! use std::path::Path;
//!
//! let resolver = NodeModulesResolver::new();
//! let mut traversal = Traversal::new(&resolver);
//! traversal.walk(Path::new("/path/to/app"), |package| {
//!     println!("{} at {}", package.descriptor.name, package.dir.display());
//!     Ok(())
//! })?;
//! # Ok::<(), graft_core::Error>(())
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use graft_fs::real_path;

use crate::Result;
use crate::dependency::Dependency;
use crate::manifest::{PackageDescriptor, read_manifest};
use crate::resolver::PackageResolver;

/// A package handed to the visitor.
#[derive(Debug, Clone, Copy)]
pub struct VisitedPackage<'a> {
    /// Canonical package directory
    pub dir: &'a Path,
    /// Descriptor read from `dir`
    pub descriptor: &'a PackageDescriptor,
}

struct Frame {
    dir: PathBuf,
    pending: std::vec::IntoIter<Dependency>,
}

/// Visit-once traversal state shared across the roots of one load.
pub struct Traversal<R: PackageResolver> {
    resolver: R,
    visited: HashSet<PathBuf>,
    order: Vec<PathBuf>,
}

impl<R: PackageResolver> Traversal<R> {
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            visited: HashSet::new(),
            order: Vec::new(),
        }
    }

    /// Walk the graph rooted at `root`, calling `visit` for each package not
    /// seen before by this traversal.
    ///
    /// A root that does not exist or has no descriptor is not a package
    /// root: nothing is visited and `Ok(0)` is returned. Any resolution,
    /// parse or visitor error aborts the walk.
    ///
    /// Returns the number of packages visited by this call.
    pub fn walk<F>(&mut self, root: &Path, mut visit: F) -> Result<usize>
    where
        F: FnMut(&VisitedPackage<'_>) -> Result<()>,
    {
        let root = match real_path(root) {
            Ok(dir) => dir,
            Err(e) if e.is_not_found() => {
                tracing::debug!(root = %root.display(), "root does not exist; nothing to visit");
                return Ok(0);
            }
            Err(e) => return Err(e.into()),
        };

        let before = self.order.len();
        let mut stack: Vec<Frame> = Vec::new();

        if let Some(frame) = self.enter(root, &mut visit)? {
            stack.push(frame);
        }

        while let Some(frame) = stack.last_mut() {
            let Some(dependency) = frame.pending.next() else {
                stack.pop();
                continue;
            };
            let declared_by = frame.dir.clone();

            let edge = match dependency {
                Dependency::Edge(edge) => edge,
                Dependency::Opaque(entry) => {
                    tracing::warn!(
                        package = %declared_by.display(),
                        %entry,
                        "skipping dependency entry without an identifier"
                    );
                    continue;
                }
            };

            let dir = self.resolver.resolve(&edge.resolution_key, &declared_by)?;
            if self.visited.contains(&dir) {
                tracing::trace!(
                    dependency = %edge.import_name,
                    dir = %dir.display(),
                    "already visited"
                );
                continue;
            }

            if let Some(frame) = self.enter(dir, &mut visit)? {
                stack.push(frame);
            }
        }

        Ok(self.order.len() - before)
    }

    /// Mark `dir` visited, read its descriptor and run the visitor.
    ///
    /// Returns the frame holding its dependencies, or `None` when the
    /// directory was already visited or is not a package.
    fn enter<F>(&mut self, dir: PathBuf, visit: &mut F) -> Result<Option<Frame>>
    where
        F: FnMut(&VisitedPackage<'_>) -> Result<()>,
    {
        if !self.visited.insert(dir.clone()) {
            return Ok(None);
        }

        let Some(descriptor) = read_manifest(&dir)? else {
            tracing::debug!(dir = %dir.display(), "not a package; skipping");
            return Ok(None);
        };

        tracing::debug!(
            package = %descriptor.name,
            dir = %dir.display(),
            dependencies = descriptor.dependencies.len(),
            "visiting package"
        );
        visit(&VisitedPackage {
            dir: &dir,
            descriptor: &descriptor,
        })?;
        self.order.push(dir.clone());

        Ok(Some(Frame {
            dir,
            pending: descriptor.dependencies.into_iter(),
        }))
    }

    /// Canonical directories visited so far, in visit order.
    pub fn visited(&self) -> &[PathBuf] {
        &self.order
    }

    /// Whether `dir` (already canonical) has been visited.
    pub fn has_visited(&self, dir: &Path) -> bool {
        self.visited.contains(dir)
    }

    pub fn into_visited(self) -> Vec<PathBuf> {
        self.order
    }
}

/// Collect the canonical directories of every package reachable from `root`,
/// in visit order.
pub fn collect_packages<R: PackageResolver>(root: &Path, resolver: R) -> Result<Vec<PathBuf>> {
    let mut traversal = Traversal::new(resolver);
    traversal.walk(root, |_| Ok(()))?;
    Ok(traversal.into_visited())
}
