//! Remote record representation
//!
//! A [`Record`] is the normalized in-memory form of one remote tabular entry:
//! an identifier, a creation timestamp, and a mapping of named fields. Raw
//! payloads from the fetch layer are normalized with [`from_map`], which never
//! fails and passes non-mapping input straight through.

use crate::types::is_metadata_name;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier key in the remote wire shape
pub const REMOTE_ID_KEY: &str = "id";

/// Field mapping key in the remote wire shape
pub const REMOTE_FIELDS_KEY: &str = "fields";

/// Creation timestamp key in the remote wire shape
pub const REMOTE_CREATED_KEY: &str = "createdTime";

/// Record list key in a remote list response
pub const REMOTE_RECORDS_KEY: &str = "records";

/// One remote record
///
/// Fields never contain the local metadata keys; those values live on `id`
/// and `created_time`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "WireRecord")]
pub struct Record {
    id: Option<String>,

    fields: Map<String, Value>,

    #[serde(rename = "createdTime")]
    created_time: Option<String>,
}

/// Deserialization shape, routed through [`Record::new`]
#[derive(Deserialize)]
struct WireRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    fields: Map<String, Value>,
    #[serde(rename = "createdTime", default)]
    created_time: Option<String>,
}

impl From<WireRecord> for Record {
    fn from(wire: WireRecord) -> Self {
        Record::new(wire.id, wire.fields, wire.created_time)
    }
}

impl Record {
    /// Create a record, removing any metadata keys from `fields`
    pub fn new(
        id: Option<String>,
        mut fields: Map<String, Value>,
        created_time: Option<String>,
    ) -> Self {
        fields.retain(|name, _| {
            let reserved = is_metadata_name(name);
            if reserved {
                log::debug!("Removing reserved metadata key '{}' from record fields", name);
            }
            !reserved
        });

        Self {
            id,
            fields,
            created_time,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn created_time(&self) -> Option<&str> {
        self.created_time.as_deref()
    }

    /// Whether the remote system has assigned an identifier
    pub fn has_id(&self) -> bool {
        self.id.as_deref().map_or(false, |id| !id.is_empty())
    }

    /// Value of a field, if present
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Value of a field, or `default` when the field is absent
    pub fn get_or(&self, field: &str, default: Value) -> Value {
        self.fields.get(field).cloned().unwrap_or(default)
    }

    /// Split the record into its parts
    pub fn into_parts(self) -> (Option<String>, Map<String, Value>, Option<String>) {
        (self.id, self.fields, self.created_time)
    }

    /// Render the record in the remote wire shape
    ///
    /// Absent or empty metadata is omitted, which is the shape the remote
    /// system expects for records it has not assigned an identifier yet.
    pub fn to_payload(&self) -> Value {
        let mut payload = Map::new();
        if let Some(id) = self.id.as_deref().filter(|id| !id.is_empty()) {
            payload.insert(REMOTE_ID_KEY.to_string(), Value::String(id.to_string()));
        }
        payload.insert(
            REMOTE_FIELDS_KEY.to_string(),
            Value::Object(self.fields.clone()),
        );
        if let Some(created) = self.created_time.as_deref().filter(|t| !t.is_empty()) {
            payload.insert(
                REMOTE_CREATED_KEY.to_string(),
                Value::String(created.to_string()),
            );
        }
        Value::Object(payload)
    }

    /// Normalize every record found in a remote payload
    ///
    /// Accepts a single raw record, an array of raw records, or a list
    /// response carrying a `records` array. Non-mapping entries are skipped.
    pub fn from_list_payload(payload: Value) -> Vec<Record> {
        let items = match payload {
            Value::Array(items) => items,
            Value::Object(mut object) => match object.remove(REMOTE_RECORDS_KEY) {
                Some(Value::Array(items)) => items,
                Some(other) => {
                    object.insert(REMOTE_RECORDS_KEY.to_string(), other);
                    vec![Value::Object(object)]
                }
                None => vec![Value::Object(object)],
            },
            other => vec![other],
        };

        items
            .into_iter()
            .filter_map(|item| match from_map(item) {
                FromMap::Record(record) => Some(record),
                FromMap::PassThrough(value) => {
                    log::debug!("Skipping non-mapping list entry: {}", value);
                    None
                }
            })
            .collect()
    }
}

/// Input accepted by [`from_map`]
#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
    /// A JSON object that should become a record
    Mapping(Map<String, Value>),
    /// Anything else, returned unchanged
    Other(Value),
}

impl From<Value> for RawInput {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(object) => RawInput::Mapping(object),
            other => RawInput::Other(other),
        }
    }
}

impl From<Map<String, Value>> for RawInput {
    fn from(object: Map<String, Value>) -> Self {
        RawInput::Mapping(object)
    }
}

/// Result of [`from_map`]
#[derive(Debug, Clone, PartialEq)]
pub enum FromMap {
    Record(Record),
    PassThrough(Value),
}

impl FromMap {
    pub fn is_record(&self) -> bool {
        matches!(self, FromMap::Record(_))
    }

    pub fn into_record(self) -> Option<Record> {
        match self {
            FromMap::Record(record) => Some(record),
            FromMap::PassThrough(_) => None,
        }
    }
}

/// Normalize a raw remote payload into a [`Record`]
///
/// Missing keys degrade to defaults: no `id`, empty `fields`, no
/// `createdTime`. Values of the wrong JSON type count as missing. Input that
/// is not a mapping comes back as [`FromMap::PassThrough`].
pub fn from_map(input: impl Into<RawInput>) -> FromMap {
    match input.into() {
        RawInput::Mapping(mut object) => {
            let id = take_string(&mut object, REMOTE_ID_KEY);
            let created_time = take_string(&mut object, REMOTE_CREATED_KEY);
            let fields = match object.remove(REMOTE_FIELDS_KEY) {
                Some(Value::Object(fields)) => fields,
                _ => Map::new(),
            };
            FromMap::Record(Record::new(id, fields, created_time))
        }
        RawInput::Other(value) => FromMap::PassThrough(value),
    }
}

fn take_string(object: &mut Map<String, Value>, key: &str) -> Option<String> {
    match object.remove(key) {
        Some(Value::String(s)) => Some(s),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_map_full_record() {
        let raw = json!({
            "id": "rec123",
            "fields": {"Name": "Ada", "Age": 36},
            "createdTime": "2025-01-17T10:30:00.000Z"
        });

        let record = from_map(raw).into_record().unwrap();
        assert_eq!(record.id(), Some("rec123"));
        assert_eq!(record.created_time(), Some("2025-01-17T10:30:00.000Z"));
        assert_eq!(record.get("Name"), Some(&json!("Ada")));
        assert_eq!(record.fields().len(), 2);
    }

    #[test]
    fn test_from_map_empty_mapping_defaults() {
        let record = from_map(json!({})).into_record().unwrap();
        assert_eq!(record.id(), None);
        assert!(record.fields().is_empty());
        assert_eq!(record.created_time(), None);
    }

    #[test]
    fn test_from_map_passes_through_non_mappings() {
        for value in [
            json!(null),
            json!("error"),
            json!(42),
            json!([1, 2, 3]),
            json!(false),
        ] {
            assert_eq!(from_map(value.clone()), FromMap::PassThrough(value));
        }
    }

    #[test]
    fn test_from_map_wrong_types_count_as_missing() {
        let raw = json!({"id": 7, "fields": [1, 2], "createdTime": null});
        let record = from_map(raw).into_record().unwrap();
        assert_eq!(record, Record::default());
    }

    #[test]
    fn test_metadata_keys_removed_from_fields() {
        let raw = json!({
            "id": "rec1",
            "fields": {"airtable_id": "spoofed", "inserted_at": "x", "Name": "Ada"}
        });
        let record = from_map(raw).into_record().unwrap();
        assert_eq!(record.fields().len(), 1);
        assert!(record.get("airtable_id").is_none());
        assert_eq!(record.id(), Some("rec1"));
    }

    #[test]
    fn test_get_or_default() {
        let record = from_map(json!({"fields": {"A": 1}})).into_record().unwrap();
        assert_eq!(record.get_or("A", json!("D")), json!(1));
        assert_eq!(record.get_or("missing", json!("D")), json!("D"));
        assert_eq!(record.get_or("missing", Value::Null), Value::Null);
    }

    #[test]
    fn test_to_payload_omits_absent_metadata() {
        let mut fields = Map::new();
        fields.insert("Name".to_string(), json!("Ada"));

        let unsynced = Record::new(Some(String::new()), fields.clone(), None);
        assert!(!unsynced.has_id());
        assert_eq!(unsynced.to_payload(), json!({"fields": {"Name": "Ada"}}));

        let synced = Record::new(Some("rec9".into()), fields, Some("t9".into()));
        assert!(synced.has_id());
        assert_eq!(
            synced.to_payload(),
            json!({"id": "rec9", "fields": {"Name": "Ada"}, "createdTime": "t9"})
        );
    }

    #[test]
    fn test_from_list_payload_shapes() {
        let list = json!({
            "records": [
                {"id": "rec1", "fields": {"A": 1}},
                "not a record",
                {"id": "rec2", "fields": {"A": 2}}
            ],
            "offset": "itr123"
        });
        let records = Record::from_list_payload(list);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].id(), Some("rec2"));

        let array = json!([{"id": "rec3"}, {"id": "rec4"}]);
        assert_eq!(Record::from_list_payload(array).len(), 2);

        let single = json!({"id": "rec5", "fields": {}});
        let records = Record::from_list_payload(single);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id(), Some("rec5"));

        assert!(Record::from_list_payload(json!(null)).is_empty());
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let record: Record = serde_json::from_value(json!({
            "id": "rec1",
            "fields": {"A": 1},
            "createdTime": "t1"
        }))
        .unwrap();
        assert_eq!(record.created_time(), Some("t1"));

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["createdTime"], json!("t1"));
    }
}
