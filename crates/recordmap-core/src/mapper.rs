//! Schema mapper for translating records between remote and local shapes
//!
//! Forward conversion projects a [`Record`] onto local attributes through an
//! optional [`Correspondence`]. Reverse conversion rebuilds a [`Record`] from
//! local attributes using whatever correspondence a [`SchemaProvider`]
//! yields. Both directions are pure and allocate fresh results.
//!
//! Copyright (c) 2025 Recordmap Team
//! Licensed under the Apache-2.0 license

use crate::record::Record;
use crate::schema::{Correspondence, SchemaProvider};
use crate::types::{is_metadata_name, KeyKind, LocalAttrs, LocalKey, CREATED_KEY, ID_KEY};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Fields left behind by a conversion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversionReport {
    /// Names of fields that had no counterpart on the other side
    pub dropped: Vec<String>,
}

impl ConversionReport {
    pub fn is_lossless(&self) -> bool {
        self.dropped.is_empty()
    }
}

/// Mapper bound to one optional correspondence
///
/// `None` means pass-through: remote names are kept and every key is a
/// string key.
#[derive(Debug, Clone, Copy)]
pub struct SchemaMapper<'a> {
    correspondence: Option<&'a Correspondence>,
}

impl<'a> SchemaMapper<'a> {
    pub fn new(correspondence: Option<&'a Correspondence>) -> Self {
        Self { correspondence }
    }

    /// Mapper that keeps remote field names
    pub fn pass_through() -> Self {
        Self {
            correspondence: None,
        }
    }

    pub fn correspondence(&self) -> Option<&'a Correspondence> {
        self.correspondence
    }

    /// Key kind of everything this mapper emits on the local side
    pub fn key_kind(&self) -> KeyKind {
        self.correspondence
            .map_or(KeyKind::String, |corr| corr.key_kind)
    }

    /// Convert a record into local attributes
    pub fn to_local(&self, record: &Record) -> (LocalAttrs, ConversionReport) {
        let kind = self.key_kind();
        let mut report = ConversionReport::default();
        let mut attrs = LocalAttrs::new();

        match self.correspondence {
            None => {
                for (name, value) in record.fields() {
                    attrs.insert(LocalKey::string(name.as_str()), value.clone());
                }
            }
            Some(corr) => {
                for (name, value) in record.fields() {
                    match corr.local_key(name) {
                        Some(key) => {
                            attrs.insert(key, value.clone());
                        }
                        None => report.dropped.push(name.clone()),
                    }
                }
            }
        }

        if !report.dropped.is_empty() {
            log::debug!(
                "Dropped {} unmapped remote field(s) from record {:?}: {:?}",
                report.dropped.len(),
                record.id(),
                report.dropped
            );
        }

        attrs.insert(LocalKey::new(kind, ID_KEY), optional_string(record.id()));
        attrs.insert(
            LocalKey::new(kind, CREATED_KEY),
            optional_string(record.created_time()),
        );

        (attrs, report)
    }

    /// Convert local attributes back into a record
    pub fn to_remote(&self, attrs: &LocalAttrs) -> (Record, ConversionReport) {
        let mut report = ConversionReport::default();
        let mut fields = Map::new();

        let reverse: BTreeMap<&str, &str> = match self.correspondence {
            Some(corr) => corr.inverted(),
            None => attrs
                .keys()
                .map(LocalKey::name)
                .filter(|name| !is_metadata_name(name))
                .map(|name| (name, name))
                .collect(),
        };

        for (key, value) in attrs {
            match reverse.get(key.name()) {
                Some(remote) => {
                    fields.insert((*remote).to_string(), value.clone());
                }
                None if key.is_metadata() => {}
                None => report.dropped.push(key.name().to_string()),
            }
        }

        if !report.dropped.is_empty() {
            log::debug!(
                "Dropped {} unmapped local field(s): {:?}",
                report.dropped.len(),
                report.dropped
            );
        }

        let id = metadata_string(attrs, ID_KEY);
        let created_time = metadata_string(attrs, CREATED_KEY);

        (Record::new(Some(id), fields, Some(created_time)), report)
    }
}

/// Convert a record into local attributes
///
/// Without a correspondence every remote field is kept under its remote name
/// as a string key. With one, only mapped fields survive, renamed to their
/// local names. The `airtable_id` and `inserted_at` metadata keys are always
/// present, in the correspondence's key kind.
pub fn to_schema(record: &Record, correspondence: Option<&Correspondence>) -> LocalAttrs {
    SchemaMapper::new(correspondence).to_local(record).0
}

/// [`to_schema`], also reporting which remote fields were dropped
pub fn to_schema_with_report(
    record: &Record,
    correspondence: Option<&Correspondence>,
) -> (LocalAttrs, ConversionReport) {
    SchemaMapper::new(correspondence).to_local(record)
}

/// Rebuild a record from local attributes
///
/// The provider's correspondence is inverted to map local names back to
/// remote names. Without one, every non-metadata key maps to itself. Local
/// names resolve regardless of key kind. Identifier and creation time come
/// from the metadata keys, atom key first, and default to an empty string.
pub fn from_schema<P>(provider: &P, attrs: &LocalAttrs) -> Record
where
    P: SchemaProvider + ?Sized,
{
    from_schema_with_report(provider, attrs).0
}

/// [`from_schema`], also reporting which local fields were dropped
pub fn from_schema_with_report<P>(provider: &P, attrs: &LocalAttrs) -> (Record, ConversionReport)
where
    P: SchemaProvider + ?Sized,
{
    let schema = provider.schema();
    SchemaMapper::new(schema.as_deref()).to_remote(attrs)
}

/// Value of a record field, or `default` when absent
pub fn get(record: &Record, field: &str, default: Value) -> Value {
    record.get_or(field, default)
}

fn optional_string(value: Option<&str>) -> Value {
    value.map_or(Value::Null, |s| Value::String(s.to_string()))
}

/// Metadata value from the atom key, then the string key
///
/// Null counts as absent. Non-string values are kept as their JSON text.
fn metadata_string(attrs: &LocalAttrs, name: &str) -> String {
    [LocalKey::atom(name), LocalKey::string(name)]
        .iter()
        .filter_map(|key| attrs.get(key))
        .find_map(|value| match value {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::from_map;
    use crate::schema::NoSchema;
    use serde_json::json;

    fn record(raw: Value) -> Record {
        from_map(raw).into_record().unwrap()
    }

    fn sample() -> Record {
        record(json!({
            "id": "rec1",
            "fields": {"A": 1, "B": 2},
            "createdTime": "t1"
        }))
    }

    #[test]
    fn test_to_schema_without_correspondence_passes_through() {
        let attrs = to_schema(&sample(), None);

        let expected: LocalAttrs = [
            (LocalKey::string("A"), json!(1)),
            (LocalKey::string("B"), json!(2)),
            (LocalKey::string(ID_KEY), json!("rec1")),
            (LocalKey::string(CREATED_KEY), json!("t1")),
        ]
        .into_iter()
        .collect();
        assert_eq!(attrs, expected);
    }

    #[test]
    fn test_to_schema_projects_and_drops_unmapped() {
        let corr = Correspondence::from_pairs_with_kind(KeyKind::String, [("A", "a")]);
        let (attrs, report) = to_schema_with_report(&sample(), Some(&corr));

        assert_eq!(
            Value::Object(attrs.to_json()),
            json!({"a": 1, "airtable_id": "rec1", "inserted_at": "t1"})
        );
        assert!(!attrs.contains_key(&LocalKey::string("B")));
        assert_eq!(report.dropped, vec!["B".to_string()]);
        assert!(!report.is_lossless());
    }

    #[test]
    fn test_to_schema_metadata_follows_key_kind() {
        let corr = Correspondence::from_pairs([("A", "a")]);
        let attrs = to_schema(&sample(), Some(&corr));

        assert_eq!(attrs.get(&LocalKey::atom("a")), Some(&json!(1)));
        assert_eq!(attrs.get(&LocalKey::atom(ID_KEY)), Some(&json!("rec1")));
        assert_eq!(attrs.get(&LocalKey::atom(CREATED_KEY)), Some(&json!("t1")));
        assert!(attrs.keys().all(|k| k.kind() == KeyKind::Atom));
    }

    #[test]
    fn test_to_schema_empty_projection_defaults_to_atom_metadata() {
        let corr = Correspondence::from_pairs([("Z", "z")]);
        let attrs = to_schema(&sample(), Some(&corr));

        assert_eq!(attrs.len(), 2);
        assert!(attrs.contains_key(&LocalKey::atom(ID_KEY)));
        assert!(attrs.contains_key(&LocalKey::atom(CREATED_KEY)));
    }

    #[test]
    fn test_to_schema_missing_metadata_is_null() {
        let attrs = to_schema(&record(json!({})), None);
        assert_eq!(attrs.get(&LocalKey::string(ID_KEY)), Some(&Value::Null));
        assert_eq!(attrs.get(&LocalKey::string(CREATED_KEY)), Some(&Value::Null));
        assert_eq!(attrs.len(), 2);
    }

    #[test]
    fn test_from_schema_with_explicit_correspondence() {
        let corr = Correspondence::from_pairs([("A", "a")]);
        let attrs: LocalAttrs = [
            (LocalKey::atom("a"), json!(1)),
            (LocalKey::atom(ID_KEY), json!("rec1")),
            (LocalKey::atom(CREATED_KEY), json!("t1")),
        ]
        .into_iter()
        .collect();

        let record = from_schema(&corr, &attrs);
        assert_eq!(record.fields(), json!({"A": 1}).as_object().unwrap());
        assert_eq!(record.id(), Some("rec1"));
        assert_eq!(record.created_time(), Some("t1"));
    }

    #[test]
    fn test_from_schema_resolves_string_keys_against_atom_schema() {
        let corr = Correspondence::from_pairs([("A", "a")]);
        let attrs: LocalAttrs = [
            (LocalKey::string("a"), json!(1)),
            (LocalKey::string(ID_KEY), json!("rec1")),
        ]
        .into_iter()
        .collect();

        let record = from_schema(&corr, &attrs);
        assert_eq!(record.get("A"), Some(&json!(1)));
        assert_eq!(record.id(), Some("rec1"));
    }

    #[test]
    fn test_from_schema_without_correspondence_is_identity() {
        let attrs: LocalAttrs = [
            (LocalKey::string("x"), json!(5)),
            (LocalKey::string(ID_KEY), json!("rec2")),
        ]
        .into_iter()
        .collect();

        let (record, report) = from_schema_with_report(&NoSchema, &attrs);
        assert_eq!(record.fields(), json!({"x": 5}).as_object().unwrap());
        assert_eq!(record.id(), Some("rec2"));
        assert_eq!(record.created_time(), Some(""));
        assert!(report.is_lossless());
    }

    #[test]
    fn test_from_schema_drops_unmapped_local_fields() {
        let corr = Correspondence::from_pairs([("A", "a")]);
        let attrs: LocalAttrs = [
            (LocalKey::atom("a"), json!(1)),
            (LocalKey::atom("virtual"), json!("computed")),
        ]
        .into_iter()
        .collect();

        let (record, report) = from_schema_with_report(&corr, &attrs);
        assert_eq!(record.fields().len(), 1);
        assert_eq!(report.dropped, vec!["virtual".to_string()]);
    }

    #[test]
    fn test_from_schema_metadata_prefers_atom_key() {
        let attrs: LocalAttrs = [
            (LocalKey::string(ID_KEY), json!("from-string")),
            (LocalKey::atom(ID_KEY), json!("from-atom")),
            (LocalKey::atom(CREATED_KEY), Value::Null),
            (LocalKey::string(CREATED_KEY), json!("t-string")),
        ]
        .into_iter()
        .collect();

        let record = from_schema(&NoSchema, &attrs);
        assert_eq!(record.id(), Some("from-atom"));
        assert_eq!(record.created_time(), Some("t-string"));
        assert!(record.fields().is_empty());
    }

    #[test]
    fn test_from_schema_missing_metadata_is_empty_string() {
        let record = from_schema(&NoSchema, &LocalAttrs::new());
        assert_eq!(record.id(), Some(""));
        assert_eq!(record.created_time(), Some(""));
        assert!(!record.has_id());
    }

    #[test]
    fn test_round_trip_with_correspondence() {
        let corr = Correspondence::from_pairs([("A", "a"), ("B", "b")]);
        let original = sample();

        let attrs = to_schema(&original, Some(&corr));
        let restored = from_schema(&corr, &attrs);

        assert_eq!(restored, original);
    }

    #[test]
    fn test_round_trip_without_correspondence() {
        let original = sample();
        let attrs = to_schema(&original, None);
        let restored = from_schema(&NoSchema, &attrs);
        assert_eq!(restored, original);
    }

    #[test]
    fn test_get_accessor() {
        let record = sample();
        assert_eq!(get(&record, "A", Value::Null), json!(1));
        assert_eq!(get(&record, "missing", json!("D")), json!("D"));
    }

    #[test]
    fn test_mapper_key_kind() {
        assert_eq!(SchemaMapper::pass_through().key_kind(), KeyKind::String);
        let corr = Correspondence::new(KeyKind::Atom);
        assert_eq!(SchemaMapper::new(Some(&corr)).key_kind(), KeyKind::Atom);
        assert!(SchemaMapper::new(Some(&corr)).correspondence().is_some());
    }
}
