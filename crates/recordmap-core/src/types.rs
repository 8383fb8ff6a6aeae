//! Core data types for the local side of the record mapping
//!
//! Local attributes are keyed by field names that carry a key kind: either a
//! plain string key or an atom-like identifier key. The kind is chosen by the
//! correspondence that produced the attributes, never sampled from the data.
//!
//! Copyright (c) 2025 Recordmap Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

/// Local metadata key mirroring the remote record identifier
pub const ID_KEY: &str = "airtable_id";

/// Local metadata key mirroring the remote creation timestamp
pub const CREATED_KEY: &str = "inserted_at";

/// Returns true for the two reserved metadata key names
pub fn is_metadata_name(name: &str) -> bool {
    name == ID_KEY || name == CREATED_KEY
}

/// Representation used for keys of local attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyKind {
    /// Plain string keys
    String,
    /// Atom-like identifier keys
    #[default]
    Atom,
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyKind::String => write!(f, "string"),
            KeyKind::Atom => write!(f, "atom"),
        }
    }
}

/// A key of a local attribute mapping
///
/// `Str("name")` and `Atom("name")` are distinct keys. Lookups that should
/// treat them as the same field go through [`LocalAttrs::get_named`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LocalKey {
    Str(String),
    Atom(String),
}

impl LocalKey {
    /// Create a key of the given kind
    pub fn new(kind: KeyKind, name: impl Into<String>) -> Self {
        match kind {
            KeyKind::String => LocalKey::Str(name.into()),
            KeyKind::Atom => LocalKey::Atom(name.into()),
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        LocalKey::Str(name.into())
    }

    pub fn atom(name: impl Into<String>) -> Self {
        LocalKey::Atom(name.into())
    }

    /// The field name without its kind
    pub fn name(&self) -> &str {
        match self {
            LocalKey::Str(name) | LocalKey::Atom(name) => name,
        }
    }

    pub fn kind(&self) -> KeyKind {
        match self {
            LocalKey::Str(_) => KeyKind::String,
            LocalKey::Atom(_) => KeyKind::Atom,
        }
    }

    /// Whether this key is one of the two metadata keys, in either kind
    pub fn is_metadata(&self) -> bool {
        is_metadata_name(self.name())
    }
}

impl fmt::Display for LocalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A local-shaped attribute mapping
///
/// Iteration is ordered by key, with all string keys ahead of all atom keys.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LocalAttrs {
    entries: BTreeMap<LocalKey, Value>,
}

impl LocalAttrs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build attributes from a JSON object, tagging every key with `kind`
    pub fn from_json(object: Map<String, Value>, kind: KeyKind) -> Self {
        object
            .into_iter()
            .map(|(name, value)| (LocalKey::new(kind, name), value))
            .collect()
    }

    /// Insert a value, returning the previous value for the same key
    pub fn insert(&mut self, key: LocalKey, value: Value) -> Option<Value> {
        self.entries.insert(key, value)
    }

    pub fn get(&self, key: &LocalKey) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Look up a field by name in either key kind, atom first
    pub fn get_named(&self, name: &str) -> Option<&Value> {
        self.entries
            .get(&LocalKey::atom(name))
            .or_else(|| self.entries.get(&LocalKey::string(name)))
    }

    pub fn contains_key(&self, key: &LocalKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, LocalKey, Value> {
        self.entries.iter()
    }

    pub fn keys(&self) -> btree_map::Keys<'_, LocalKey, Value> {
        self.entries.keys()
    }

    /// Flatten into a JSON object keyed by field name
    ///
    /// When the same name exists in both kinds, the atom entry wins.
    pub fn to_json(&self) -> Map<String, Value> {
        let mut object = Map::with_capacity(self.entries.len());
        for (key, value) in &self.entries {
            object.insert(key.name().to_string(), value.clone());
        }
        object
    }
}

impl FromIterator<(LocalKey, Value)> for LocalAttrs {
    fn from_iter<I: IntoIterator<Item = (LocalKey, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for LocalAttrs {
    type Item = (LocalKey, Value);
    type IntoIter = btree_map::IntoIter<LocalKey, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a LocalAttrs {
    type Item = (&'a LocalKey, &'a Value);
    type IntoIter = btree_map::Iter<'a, LocalKey, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for LocalAttrs {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}
