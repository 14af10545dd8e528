//! # Raw Configuration
//!
//! Unparsed key/value source consumed once by the properties builder.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where a [`RawConfig`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Fixed development profile.
    Local,

    /// Caller-supplied map, normally the controller ConfigMap `data`.
    External
}

/// Raw string key/value configuration.
///
/// Keys are unique and order is irrelevant; a `BTreeMap` keeps debug output
/// and serialized dumps stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawConfig {
    entries: BTreeMap<String, String>,
    provenance: Provenance
}

impl RawConfig {
    pub fn external<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>
    {
        Self::with_provenance(entries, Provenance::External)
    }

    pub(crate) fn with_provenance<I, K, V>(entries: I, provenance: Provenance) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            provenance
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Returns a copy with `key` set, replacing any previous value.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }
}

impl<K, V> FromIterator<(K, V)> for RawConfig
where
    K: Into<String>,
    V: Into<String>
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::external(iter)
    }
}

impl From<BTreeMap<String, String>> for RawConfig {
    fn from(entries: BTreeMap<String, String>) -> Self {
        Self {
            entries,
            provenance: Provenance::External
        }
    }
}

impl From<std::collections::HashMap<String, String>> for RawConfig {
    fn from(entries: std::collections::HashMap<String, String>) -> Self {
        Self::external(entries)
    }
}
