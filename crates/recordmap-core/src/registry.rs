//! Schema registry loaded from table definition files
//!
//! A registry names the tables an application maps and carries each table's
//! optional correspondence. Definitions can be written in JSON, YAML or TOML:
//!
//! ```yaml
//! tables:
//!   contacts:
//!     key_kind: atom
//!     fields:
//!       Name: name
//!       Email Address: email
//!   notes: {}
//! ```
//!
//! A table without `fields` has no correspondence and converts by
//! pass-through.

use crate::schema::{Correspondence, SchemaProvider};
use crate::types::KeyKind;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Source format of a schema definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    Json,
    Yaml,
    Toml,
}

impl SchemaFormat {
    /// Pick the format from a file extension, defaulting to JSON
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => SchemaFormat::Yaml,
            Some("toml") => SchemaFormat::Toml,
            _ => SchemaFormat::Json,
        }
    }
}

impl fmt::Display for SchemaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaFormat::Json => write!(f, "JSON"),
            SchemaFormat::Yaml => write!(f, "YAML"),
            SchemaFormat::Toml => write!(f, "TOML"),
        }
    }
}

/// One named table and its optional correspondence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    name: String,
    correspondence: Option<Correspondence>,
}

impl TableSchema {
    pub fn new(name: impl Into<String>, correspondence: Option<Correspondence>) -> Self {
        Self {
            name: name.into(),
            correspondence,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn correspondence(&self) -> Option<&Correspondence> {
        self.correspondence.as_ref()
    }

    /// Key kind local attributes of this table use
    pub fn key_kind(&self) -> KeyKind {
        self.correspondence
            .as_ref()
            .map_or(KeyKind::String, |corr| corr.key_kind)
    }
}

impl SchemaProvider for TableSchema {
    fn schema(&self) -> Option<Cow<'_, Correspondence>> {
        self.correspondence.as_ref().map(Cow::Borrowed)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SchemaFile {
    #[serde(default)]
    tables: BTreeMap<String, TableDefinition>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct TableDefinition {
    #[serde(default)]
    key_kind: KeyKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fields: Option<BTreeMap<String, String>>,
}

/// Named table schemas
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaRegistry {
    tables: BTreeMap<String, TableSchema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a registry from a definition file, choosing the format by extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::schema_file(format!("cannot read {}", path.display()), e)
        })?;
        log::debug!("Loading schema definitions from {}", path.display());
        Self::from_str_with_format(&content, SchemaFormat::from_path(path))
    }

    /// Parse a registry from definition text
    pub fn from_str_with_format(content: &str, format: SchemaFormat) -> Result<Self> {
        let file: SchemaFile = match format {
            SchemaFormat::Json => serde_json::from_str(content)
                .map_err(|e| Error::schema_file("invalid JSON schema definition", e))?,
            SchemaFormat::Yaml => serde_yaml::from_str(content)
                .map_err(|e| Error::schema_file("invalid YAML schema definition", e))?,
            SchemaFormat::Toml => toml::from_str(content)
                .map_err(|e| Error::schema_file("invalid TOML schema definition", e))?,
        };

        let registry = file
            .tables
            .into_iter()
            .map(|(name, definition)| {
                let correspondence = definition.fields.map(|fields| Correspondence {
                    key_kind: definition.key_kind,
                    fields,
                });
                TableSchema::new(name, correspondence)
            })
            .collect();

        Ok(registry)
    }

    /// Add a table, replacing any table of the same name
    pub fn insert(&mut self, table: TableSchema) -> Option<TableSchema> {
        self.tables.insert(table.name.clone(), table)
    }

    /// Look up a table by name
    pub fn table(&self, name: &str) -> Result<&TableSchema> {
        self.tables.get(name).ok_or_else(|| Error::UnknownTable {
            name: name.to_string(),
            known: self.tables.keys().cloned().collect(),
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn tables(&self) -> impl Iterator<Item = &TableSchema> {
        self.tables.values()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Validate every correspondence in the registry
    ///
    /// Stops at the first invalid table in strict mode.
    pub fn validate(&self, strict: bool) -> Result<()> {
        for table in self.tables.values() {
            if let Some(corr) = &table.correspondence {
                corr.validate(strict).map_err(|e| match e {
                    Error::SchemaValidation { message, .. } => Error::SchemaValidation {
                        message: format!("table '{}': {}", table.name, message),
                        table: Some(table.name.clone()),
                    },
                    other => other,
                })?;
            }
        }
        Ok(())
    }

    /// Serialize the registry back into definition text
    pub fn to_string_with_format(&self, format: SchemaFormat) -> Result<String> {
        let file = SchemaFile {
            tables: self
                .tables
                .values()
                .map(|table| {
                    let definition = TableDefinition {
                        key_kind: table.key_kind(),
                        fields: table.correspondence.as_ref().map(|c| c.fields.clone()),
                    };
                    (table.name.clone(), definition)
                })
                .collect(),
        };

        let text = match format {
            SchemaFormat::Json => serde_json::to_string_pretty(&file)?,
            SchemaFormat::Yaml => serde_yaml::to_string(&file)
                .map_err(|e| Error::schema_file("cannot render YAML", e))?,
            SchemaFormat::Toml => toml::to_string_pretty(&file)
                .map_err(|e| Error::schema_file("cannot render TOML", e))?,
        };
        Ok(text)
    }
}

impl FromIterator<TableSchema> for SchemaRegistry {
    fn from_iter<I: IntoIterator<Item = TableSchema>>(iter: I) -> Self {
        Self {
            tables: iter
                .into_iter()
                .map(|table| (table.name.clone(), table))
                .collect(),
        }
    }
}
