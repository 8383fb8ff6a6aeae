//! Shared utilities for command handlers

use crate::config::Config;
use crate::error::{Error, ErrorContext, Result};
use recordmap_core::{SchemaRegistry, TableSchema};
use serde_json::Value;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Read a JSON (or YAML, by extension) document from a file or `-` for stdin
pub fn read_json_input(path: &Path) -> Result<Value> {
    if path == Path::new("-") {
        let mut content = String::new();
        io::stdin()
            .read_to_string(&mut content)
            .context("reading standard input")?;
        return parse_json(&content, path);
    }

    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path)?;

    let is_yaml = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.eq_ignore_ascii_case("yaml") || s.eq_ignore_ascii_case("yml"))
        .unwrap_or(false);

    if is_yaml {
        serde_yaml::from_str(&content).map_err(|e| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: format!("YAML ({})", e),
        })
    } else {
        parse_json(&content, path)
    }
}

fn parse_json(content: &str, path: &Path) -> Result<Value> {
    serde_json::from_str(content).map_err(|e| Error::InvalidFormat {
        path: path.to_path_buf(),
        expected: format!("JSON ({})", e),
    })
}

/// Load the configured schema registry, if any
pub fn load_registry(config: &Config) -> Result<Option<SchemaRegistry>> {
    let Some(path) = config.schema_file.as_deref() else {
        tracing::debug!("No schema file configured");
        return Ok(None);
    };

    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let registry = SchemaRegistry::from_path(path)?;
    registry.validate(config.strict)?;

    tracing::info!(
        path = %path.display(),
        tables = registry.len(),
        "Loaded schema registry"
    );

    Ok(Some(registry))
}

/// Look up the requested table
///
/// No table means pass-through. Asking for a table without a registry is an
/// argument error.
pub fn select_table<'r>(
    registry: Option<&'r SchemaRegistry>,
    table: Option<&str>,
) -> Result<Option<&'r TableSchema>> {
    match (registry, table) {
        (_, None) => Ok(None),
        (None, Some(name)) => Err(Error::NoSchemaFile {
            table: name.to_string(),
        }),
        (Some(registry), Some(name)) => Ok(Some(registry.table(name)?)),
    }
}
