//! Reconciles a source document with the previously translated output.

use crate::store::OrderedStore;

/// Result of merging a source document with an existing translation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Same keys and order as the source; translated values where they exist.
    pub merged: OrderedStore,
    /// Keys whose value still has to be translated, in source order.
    pub untranslated: Vec<String>,
}

impl MergeOutcome {
    /// The raw source text of every untranslated key, in source order.
    pub fn pending(&self) -> OrderedStore {
        self.untranslated
            .iter()
            .filter_map(|key| self.merged.get(key).map(|value| (key.as_str(), value)))
            .collect()
    }

    /// Writes translated values back over their placeholders.
    pub fn apply(&mut self, translated: &OrderedStore) {
        for (key, value) in translated {
            if self.merged.contains_key(key) {
                self.merged.set(key, value);
            }
        }
    }
}

/// Merges `source` against `existing`.
///
/// A key counts as untranslated when `existing` lacks it or still holds the
/// exact source text. Keys that only exist in `existing` are dropped.
pub fn merge(source: &OrderedStore, existing: &OrderedStore) -> MergeOutcome {
    let mut merged = OrderedStore::with_capacity(source.len());
    let mut untranslated = Vec::new();

    for (key, source_value) in source {
        match existing.get(key) {
            Some(existing_value) if existing_value != source_value => {
                merged.set(key, existing_value);
            }
            _ => {
                merged.set(key, source_value);
                untranslated.push(key.to_owned());
            }
        }
    }

    MergeOutcome {
        merged,
        untranslated,
    }
}
