//! Command implementations

use std::io::Write;
use std::path::PathBuf;

use colored::Colorize;
use graft_core::{LoaderOptions, NodeModulesResolver, Traversal};
use serde_json::{Value, json};

use crate::context::AppContext;
use crate::error::{CliError, Result};

/// Print the merged configuration, or a single namespace of it.
pub fn run_show(
    out: &mut impl Write,
    context: &AppContext,
    namespace: Option<&str>,
    compact: bool,
) -> Result<()> {
    let value = match namespace {
        Some(name) => context
            .config
            .get(&name.to_lowercase())
            .cloned()
            .ok_or_else(|| CliError::user(format!("No configuration for namespace `{name}`")))?,
        None => context.config.to_value(),
    };
    write_json(out, &value, compact)
}

/// Print one value by JSON pointer.
///
/// Strings are printed bare so the output can be used directly in scripts.
pub fn run_get(out: &mut impl Write, context: &AppContext, pointer: &str) -> Result<()> {
    let pointer = if pointer.starts_with('/') {
        pointer.to_string()
    } else {
        format!("/{pointer}")
    };
    let value = context
        .config
        .pointer(&pointer)
        .ok_or_else(|| CliError::user(format!("No value at `{pointer}`")))?;

    match value {
        Value::String(s) => writeln!(out, "{s}")?,
        other => write_json(out, other, false)?,
    }
    Ok(())
}

/// A package discovered by `run_packages`
struct PackageRow {
    namespace: String,
    dir: PathBuf,
}

/// List discovered packages in visit order.
pub fn run_packages(out: &mut impl Write, options: &LoaderOptions, as_json: bool) -> Result<()> {
    options.validate()?;

    let mut rows = Vec::new();
    let mut traversal = Traversal::new(NodeModulesResolver::new());
    for root in options.roots() {
        let root = std::path::absolute(root)?;
        traversal.walk(&root, |package| {
            rows.push(PackageRow {
                namespace: package.descriptor.name.clone(),
                dir: package.dir.to_path_buf(),
            });
            Ok(())
        })?;
    }

    if as_json {
        let listing: Vec<Value> = rows
            .iter()
            .map(|row| json!({"namespace": row.namespace, "path": row.dir.display().to_string()}))
            .collect();
        return write_json(out, &Value::Array(listing), false);
    }

    if rows.is_empty() {
        writeln!(out, "{}", "No packages found.".yellow())?;
        return Ok(());
    }
    for row in &rows {
        writeln!(out, "{}  {}", row.namespace.green().bold(), row.dir.display())?;
    }
    Ok(())
}

fn write_json(out: &mut impl Write, value: &Value, compact: bool) -> Result<()> {
    let text = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    writeln!(out, "{text}")?;
    Ok(())
}
