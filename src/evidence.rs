//! Evidence container
//!
//! `EvidenceMap` is the flat key/value output of every transform. Keys carry a
//! namespace prefix (`header.`, `query.`, ...) followed by a field name.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Namespace part of an evidence key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvidencePrefix {
    Header,
    Query,
    Server,
    Cookie,
}

impl EvidencePrefix {
    pub const ALL: [EvidencePrefix; 4] = [
        EvidencePrefix::Server,
        EvidencePrefix::Header,
        EvidencePrefix::Query,
        EvidencePrefix::Cookie,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EvidencePrefix::Header => "header.",
            EvidencePrefix::Query => "query.",
            EvidencePrefix::Server => "server.",
            EvidencePrefix::Cookie => "cookie.",
        }
    }

    /// Prefix of `key`; a bare prefix with no field is not a key.
    pub fn from_key(key: &str) -> Option<EvidencePrefix> {
        EvidencePrefix::ALL
            .into_iter()
            .find(|prefix| key.len() > prefix.as_str().len() && key.starts_with(prefix.as_str()))
    }
}

/// Insertion-ordered evidence key/value map.
///
/// A repeated key overwrites the earlier value in place. The capacity given at
/// construction only pre-allocates; the map grows past it as needed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvidenceMap {
    entries: Vec<(String, String)>,
}

impl EvidenceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Insert or overwrite, returning the previous value for `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    /// Remove every entry, keeping the allocated storage for reuse.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, v)| v.as_str())
    }

    /// Entries under `prefix`, yielded as `(field, value)` with the prefix removed.
    pub fn iter_prefix(&self, prefix: EvidencePrefix) -> impl Iterator<Item = (&str, &str)> {
        self.iter()
            .filter(move |(k, _)| EvidencePrefix::from_key(k) == Some(prefix))
            .map(move |(k, v)| (&k[prefix.as_str().len()..], v))
    }
}

impl IntoIterator for EvidenceMap {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Borrowing iterator over an [`EvidenceMap`] in insertion order.
pub struct Iter<'a> {
    inner: std::slice::Iter<'a, (String, String)>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a> IntoIterator for &'a EvidenceMap {
    type Item = (&'a str, &'a str);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for EvidenceMap {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EvidenceMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = EvidenceMap::new();
        map.extend(iter);
        map
    }
}

impl Serialize for EvidenceMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
