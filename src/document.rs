//! Reading and writing flat `{ "key": "value" }` JSON documents.
//!
//! Decoding goes through a serde visitor that feeds entries into an
//! [`OrderedStore`] in the order they appear in the file, so keys are never
//! reshuffled by an intermediate hash map. Encoding writes one entry per line
//! with two-space indentation and leaves HTML characters unescaped.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::fs::atomic_write;
use crate::store::OrderedStore;

struct FlatObject(OrderedStore);

impl<'de> Deserialize<'de> for FlatObject {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(FlatObjectVisitor)
    }
}

struct FlatObjectVisitor;

impl<'de> Visitor<'de> for FlatObjectVisitor {
    type Value = FlatObject;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a JSON object whose values are all strings")
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut store = OrderedStore::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<String, String>()? {
            store.set(key, value);
        }
        Ok(FlatObject(store))
    }
}

/// Parses the text of a flat JSON document.
///
/// `path` is only used to label errors.
pub fn decode(text: &str, path: &Path) -> Result<OrderedStore> {
    serde_json::from_str::<FlatObject>(text)
        .map(|FlatObject(store)| store)
        .map_err(|err| Error::malformed(path, err))
}

/// Serializes a store as a JSON object, one entry per line, in insertion order.
pub fn encode(store: &OrderedStore) -> String {
    let mut out = String::from("{\n");
    let last = store.len().saturating_sub(1);

    for (i, (key, value)) in store.iter().enumerate() {
        out.push_str("  ");
        out.push_str(&quote(key));
        out.push_str(": ");
        out.push_str(&quote(value));
        if i < last {
            out.push(',');
        }
        out.push('\n');
    }

    out.push_str("}\n");
    out
}

// serde_json only escapes quotes, backslashes and control characters,
// so markup like `<b>` and `&amp;` survives verbatim.
fn quote(text: &str) -> String {
    Value::String(text.to_owned()).to_string()
}

/// Reads a document that must exist (the translation source).
pub fn read_document(path: &Path) -> Result<OrderedStore> {
    let text = fs::read_to_string(path).map_err(|err| Error::file_system(path, err))?;
    decode(&text, path)
}

/// Reads a previously written output document.
///
/// A missing file yields an empty store so the first run for a new language
/// needs no setup.
pub fn read_existing_document(path: &Path) -> Result<OrderedStore> {
    match fs::read_to_string(path) {
        Ok(text) => decode(&text, path),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(OrderedStore::new()),
        Err(err) => Err(Error::file_system(path, err)),
    }
}

/// Writes a document, creating the parent directory when needed.
pub fn write_document(path: &Path, store: &OrderedStore) -> Result<()> {
    atomic_write(path, &encode(store)).map_err(|err| Error::file_system(path, err))
}
