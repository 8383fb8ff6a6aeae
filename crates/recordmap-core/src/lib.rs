//! Recordmap Core - Translation between remote records and local schemas
//!
//! This crate converts generic remote records (an identifier, a creation
//! timestamp and a mapping of named fields) into local-shaped attribute maps
//! and back, renaming fields through a declared correspondence.
//!
//! # Main Components
//!
//! - **Record**: normalized remote record, built with [`from_map`]
//! - **Correspondence**: remote to local field names plus the local key kind
//! - **Schema Mapper**: [`to_schema`], [`from_schema`] and [`get`]
//! - **Schema Registry**: named tables loaded from JSON, YAML or TOML files
//!
//! # Example
//!
//! ```
//! use recordmap_core::{from_map, from_schema, to_schema, Correspondence, LocalKey};
//! use serde_json::json;
//!
//! let raw = json!({"id": "rec1", "fields": {"Name": "Ada", "Notes": "x"}, "createdTime": "t1"});
//! let record = from_map(raw).into_record().expect("raw record is a mapping");
//!
//! let contacts = Correspondence::from_pairs([("Name", "name")]);
//! let attrs = to_schema(&record, Some(&contacts));
//! assert_eq!(attrs.get(&LocalKey::atom("name")), Some(&json!("Ada")));
//! assert!(attrs.get(&LocalKey::atom("Notes")).is_none());
//!
//! let back = from_schema(&contacts, &attrs);
//! assert_eq!(back.id(), Some("rec1"));
//! ```

pub mod error;
pub mod mapper;
pub mod record;
pub mod registry;
pub mod schema;
pub mod types;

// Re-export main types for convenience
pub use error::{Error, Result};
pub use mapper::{
    from_schema, from_schema_with_report, get, to_schema, to_schema_with_report,
    ConversionReport, SchemaMapper,
};
pub use record::{from_map, FromMap, RawInput, Record};
pub use registry::{SchemaFormat, SchemaRegistry, TableSchema};
pub use schema::{Correspondence, NoSchema, SchemaProvider};
pub use types::{KeyKind, LocalAttrs, LocalKey, CREATED_KEY, ID_KEY};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
