//! Insertion-ordered string map used for every document the tool touches.

use std::collections::HashMap;

/// A string-to-string map that remembers the order keys were first inserted.
///
/// The key list and the value map always hold the same key set; the only
/// mutation is [`OrderedStore::set`], which appends unseen keys and updates
/// known ones in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedStore {
    keys: Vec<String>,
    values: HashMap<String, String>,
}

impl OrderedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            keys: Vec::with_capacity(capacity),
            values: HashMap::with_capacity(capacity),
        }
    }

    /// Inserts or updates `key`. A key seen before keeps its original position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self.values.get_mut(&key) {
            *slot = value;
        } else {
            self.keys.push(key.clone());
            self.values.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl ExactSizeIterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    /// `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            keys: self.keys.iter(),
            values: &self.values,
        }
    }
}

/// Borrowing iterator over an [`OrderedStore`] in insertion order.
pub struct Iter<'a> {
    keys: std::slice::Iter<'a, String>,
    values: &'a HashMap<String, String>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.keys.next()?;
        let value = self.values.get(key)?;
        Some((key.as_str(), value.as_str()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a OrderedStore {
    type Item = (&'a str, &'a str);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for OrderedStore {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for OrderedStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut store = Self::new();
        store.extend(iter);
        store
    }
}
