//! End-to-end tests for record conversion in both directions


use recordmap_core::{
    from_map, from_schema, from_schema_with_report, get, to_schema, to_schema_with_report,
    Correspondence, FromMap, KeyKind, LocalKey, NoSchema, SchemaProvider, TableSchema,
    CREATED_KEY, ID_KEY,
};
use serde_json::{json, Value};
use pretty_assertions::assert_eq;
use std::borrow::Cow;
use test_support::*;

#[test]
fn test_from_map_passes_through_non_mapping_values() {
    let error_marker = json!({"error": "NOT_FOUND"});
    assert!(from_map(error_marker).is_record());

    for value in [json!("error"), json!(null), json!([{"id": "rec1"}]), json!(3.5)] {
        assert_eq!(from_map(value.clone()), FromMap::PassThrough(value));
    }
}

#[test]
fn test_from_map_defaults() {
    let record = record(json!({}));
    assert_eq!(record.id(), None);
    assert!(record.fields().is_empty());
    assert_eq!(record.created_time(), None);
}

#[test]
fn test_accessor_default() {
    let record = contact_record();
    assert_eq!(get(&record, "missing", json!("D")), json!("D"));
    assert_eq!(get(&record, "Name", Value::Null), json!("Ada Lovelace"));
}

#[test]
fn test_to_schema_without_correspondence() {
    let record = contact_record();
    let attrs = to_schema(&record, None);

    let mut expected = record.fields().clone();
    expected.insert(ID_KEY.to_string(), json!("recA1b2C3"));
    expected.insert(CREATED_KEY.to_string(), json!("2025-01-17T10:30:00.000Z"));

    assert_eq!(attrs.to_json(), expected);
    assert!(attrs.keys().all(|k| k.kind() == KeyKind::String));
}

#[test]
fn test_projection_drops_unmapped_fields() {
    let record = record(json!({"id": "rec1", "fields": {"A": 1, "B": 2}, "createdTime": "t1"}));
    let corr = Correspondence::from_pairs_with_kind(KeyKind::String, [("A", "a")]);

    let attrs = to_schema(&record, Some(&corr));
    assert_eq!(
        Value::Object(attrs.to_json()),
        json!({"a": 1, "airtable_id": "rec1", "inserted_at": "t1"})
    );
}

#[test]
fn test_projection_keeps_nested_values_verbatim() {
    let (attrs, report) = to_schema_with_report(&contact_record(), Some(&contacts_schema()));

    assert_eq!(attrs.get(&LocalKey::atom("tags")), Some(&json!(["math", "engines"])));
    assert_eq!(attrs.get(&LocalKey::atom("address")), Some(&json!({"city": "London"})));
    assert_eq!(report.dropped, vec!["Internal Notes".to_string()]);
}

#[test]
fn test_reverse_with_explicit_schema() {
    let corr = Correspondence::from_pairs_with_kind(KeyKind::String, [("A", "a")]);
    let input = attrs([
        (LocalKey::string("a"), json!(1)),
        (LocalKey::string(ID_KEY), json!("rec1")),
        (LocalKey::string(CREATED_KEY), json!("t1")),
    ]);

    let record = from_schema(&corr, &input);
    assert_eq!(Value::Object(record.fields().clone()), json!({"A": 1}));
    assert_eq!(record.id(), Some("rec1"));
    assert_eq!(record.created_time(), Some("t1"));
}

#[test]
fn test_reverse_without_schema_is_identity() {
    let input = attrs([
        (LocalKey::string("x"), json!(5)),
        (LocalKey::string(ID_KEY), json!("rec2")),
    ]);

    let record = from_schema(&NoSchema, &input);
    assert_eq!(Value::Object(record.fields().clone()), json!({"x": 5}));
    assert_eq!(record.id(), Some("rec2"));
}

#[test]
fn test_reverse_through_table_descriptor() {
    let table = TableSchema::new("contacts", Some(contacts_schema()));
    let input = attrs([
        (LocalKey::atom("name"), json!("Grace")),
        (LocalKey::atom("email"), json!("grace@example.com")),
        (LocalKey::atom("nickname"), json!("amazing")),
    ]);

    let (record, report) = from_schema_with_report(&table, &input);
    assert_eq!(record.get("Name"), Some(&json!("Grace")));
    assert_eq!(record.get("Email Address"), Some(&json!("grace@example.com")));
    assert_eq!(record.fields().len(), 2);
    assert_eq!(report.dropped, vec!["nickname".to_string()]);
    assert!(!record.has_id());
    assert_eq!(record.to_payload(), json!({
        "fields": {"Name": "Grace", "Email Address": "grace@example.com"}
    }));
}

#[test]
fn test_round_trip_preserves_fields_and_metadata() {
    let original = contact_record();

    for corr in [contacts_schema(), contacts_schema_strings()] {
        let attrs = to_schema(&original, Some(&corr));
        let restored = from_schema(&corr, &attrs);

        assert_eq!(restored.id(), original.id());
        assert_eq!(restored.created_time(), original.created_time());
        for (remote, value) in restored.fields() {
            assert_eq!(original.get(remote), Some(value));
        }
        assert_eq!(restored.fields().len(), corr.len());
    }
}

#[test]
fn test_round_trip_without_schema() {
    let original = contact_record();
    let attrs = to_schema(&original, None);
    assert_eq!(from_schema(&NoSchema, &attrs), original);
}

struct DynamicSchema {
    enabled: bool,
    corr: Correspondence,
}

impl SchemaProvider for DynamicSchema {
    fn schema(&self) -> Option<Cow<'_, Correspondence>> {
        self.enabled.then(|| Cow::Owned(self.corr.clone()))
    }
}

#[test]
fn test_custom_provider_capability() {
    let input = attrs([
        (LocalKey::atom("name"), json!("Ada")),
        (LocalKey::atom(ID_KEY), json!("rec1")),
    ]);

    let on = DynamicSchema { enabled: true, corr: contacts_schema() };
    assert_eq!(from_schema(&on, &input).get("Name"), Some(&json!("Ada")));

    let off = DynamicSchema { enabled: false, corr: contacts_schema() };
    assert_eq!(from_schema(&off, &input).get("name"), Some(&json!("Ada")));

    let providers: Vec<Box<dyn SchemaProvider>> = vec![Box::new(on), Box::new(NoSchema)];
    let names: Vec<_> = providers
        .iter()
        .map(|p| from_schema(p.as_ref(), &input).fields().keys().cloned().collect::<Vec<_>>())
        .collect();
    assert_eq!(names, vec![vec!["Name".to_string()], vec!["name".to_string()]]);
}
