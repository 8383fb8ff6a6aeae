//! Field correspondences and the schema provider capability
//!
//! A [`Correspondence`] maps remote field names to local field names and
//! declares which key kind its local names use. Anything that can answer
//! "which correspondence applies here?" implements [`SchemaProvider`].
//!
//! Copyright (c) 2025 Recordmap Team
//! Licensed under the Apache-2.0 license

use crate::types::{is_metadata_name, KeyKind, LocalKey};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Declared mapping from remote field names to local field names
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Correspondence {
    /// Key kind used for local names and for the metadata keys
    #[serde(default)]
    pub key_kind: KeyKind,

    /// Remote field name to local field name
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

impl Correspondence {
    /// Create an empty correspondence producing keys of `key_kind`
    pub fn new(key_kind: KeyKind) -> Self {
        Self {
            key_kind,
            fields: BTreeMap::new(),
        }
    }

    /// Build an atom-keyed correspondence from `(remote, local)` pairs
    pub fn from_pairs<I, R, L>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (R, L)>,
        R: Into<String>,
        L: Into<String>,
    {
        Self::from_pairs_with_kind(KeyKind::Atom, pairs)
    }

    /// Build a correspondence of the given key kind from `(remote, local)` pairs
    pub fn from_pairs_with_kind<I, R, L>(key_kind: KeyKind, pairs: I) -> Self
    where
        I: IntoIterator<Item = (R, L)>,
        R: Into<String>,
        L: Into<String>,
    {
        Self {
            key_kind,
            fields: pairs
                .into_iter()
                .map(|(remote, local)| (remote.into(), local.into()))
                .collect(),
        }
    }

    /// Add a mapping, replacing any previous one for the same remote name
    pub fn with(mut self, remote: impl Into<String>, local: impl Into<String>) -> Self {
        self.fields.insert(remote.into(), local.into());
        self
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Check if a remote field has a mapping defined
    pub fn has_mapping(&self, remote: &str) -> bool {
        self.fields.contains_key(remote)
    }

    /// Local key for a remote field name
    pub fn local_key(&self, remote: &str) -> Option<LocalKey> {
        self.fields
            .get(remote)
            .map(|local| LocalKey::new(self.key_kind, local.as_str()))
    }

    /// Local name to remote name
    ///
    /// Remote names are visited in sorted order, so when two remote names
    /// target the same local name the one that sorts last is kept.
    pub fn inverted(&self) -> BTreeMap<&str, &str> {
        self.fields
            .iter()
            .map(|(remote, local)| (local.as_str(), remote.as_str()))
            .collect()
    }

    /// Local names targeted by more than one remote name
    pub fn collisions(&self) -> BTreeMap<&str, Vec<&str>> {
        let mut targets: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for (remote, local) in &self.fields {
            targets.entry(local.as_str()).or_default().push(remote.as_str());
        }
        targets.retain(|_, remotes| remotes.len() > 1);
        targets
    }

    pub fn is_injective(&self) -> bool {
        self.collisions().is_empty()
    }

    /// Remote names whose local name is a reserved metadata key
    pub fn metadata_targets(&self) -> Vec<(&str, &str)> {
        self.fields
            .iter()
            .filter(|(_, local)| is_metadata_name(local.as_str()))
            .map(|(remote, local)| (remote.as_str(), local.as_str()))
            .collect()
    }

    /// Check that the correspondence can be inverted without losing fields
    ///
    /// Collisions and local names that shadow the metadata keys are errors
    /// in strict mode. Otherwise they are logged and conversion goes on:
    /// the last-write-wins inversion applies and metadata overwrites the
    /// shadowed field.
    pub fn validate(&self, strict: bool) -> Result<()> {
        let mut problems = Vec::new();

        let collisions = self.collisions();
        if !collisions.is_empty() {
            let detail = collisions
                .iter()
                .map(|(local, remotes)| format!("'{}' <- {:?}", local, remotes))
                .collect::<Vec<_>>()
                .join(", ");
            problems.push(format!("correspondence is not injective: {}", detail));
        }

        for (remote, local) in self.metadata_targets() {
            problems.push(format!(
                "local name '{}' is reserved for metadata (mapped from '{}')",
                local, remote
            ));
        }

        if problems.is_empty() {
            return Ok(());
        }

        if strict {
            return Err(Error::SchemaValidation {
                message: problems.join("; "),
                table: None,
            });
        }

        for problem in &problems {
            log::warn!("{}", problem);
        }
        Ok(())
    }
}

/// Capability of yielding the correspondence that applies to a table
pub trait SchemaProvider {
    /// The correspondence, or `None` for pass-through conversion
    fn schema(&self) -> Option<Cow<'_, Correspondence>>;
}

/// Provider that never declares a correspondence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoSchema;

impl SchemaProvider for NoSchema {
    fn schema(&self) -> Option<Cow<'_, Correspondence>> {
        None
    }
}

impl SchemaProvider for Correspondence {
    fn schema(&self) -> Option<Cow<'_, Correspondence>> {
        Some(Cow::Borrowed(self))
    }
}

impl SchemaProvider for Option<Correspondence> {
    fn schema(&self) -> Option<Cow<'_, Correspondence>> {
        self.as_ref().map(Cow::Borrowed)
    }
}

impl<T: SchemaProvider + ?Sized> SchemaProvider for &T {
    fn schema(&self) -> Option<Cow<'_, Correspondence>> {
        (**self).schema()
    }
}

impl<T: SchemaProvider + ?Sized> SchemaProvider for Box<T> {
    fn schema(&self) -> Option<Cow<'_, Correspondence>> {
        (**self).schema()
    }
}
