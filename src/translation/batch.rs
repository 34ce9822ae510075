//! Batched translation of pending entries.
//!
//! Values are newline-protected, grouped into fixed-size batches in key
//! order and sent one batch at a time. Whitespace-only values never reach the
//! model and are passed through untouched.

use super::client::TranslationCall;
use super::prompt::{build_system_prompt, protect_newlines, restore_newlines};
use crate::error::{Error, Result};
use crate::store::OrderedStore;

/// One entry of a [`TranslationBatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    pub key: String,
    /// The value with newlines replaced by the placeholder.
    pub text: String,
    /// Whitespace-only in the original value; not sent to the model.
    pub blank: bool,
}

/// A consecutive run of at most `batch_size` pending entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationBatch {
    pub entries: Vec<BatchEntry>,
}

impl TranslationBatch {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Texts that will actually be sent, in order.
    pub fn outgoing(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|entry| !entry.blank)
            .map(|entry| entry.text.clone())
            .collect()
    }
}

/// Splits pending entries into batches of at most `batch_size`, preserving order.
pub fn plan_batches(pending: &OrderedStore, batch_size: usize) -> Result<Vec<TranslationBatch>> {
    if batch_size == 0 {
        return Err(Error::InvalidBatchSize);
    }

    let entries: Vec<BatchEntry> = pending
        .iter()
        .map(|(key, value)| BatchEntry {
            key: key.to_string(),
            text: protect_newlines(value),
            blank: value.trim().is_empty(),
        })
        .collect();

    Ok(entries
        .chunks(batch_size)
        .map(|chunk| TranslationBatch {
            entries: chunk.to_vec(),
        })
        .collect())
}

/// Progress notification emitted before each batch is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    /// 1-based batch number.
    pub index: usize,
    pub total: usize,
    /// Number of texts actually sent (blank values excluded).
    pub sent: usize,
}

/// Settings for a [`BatchTranslator`].
#[derive(Debug, Clone)]
pub struct BatchSettings {
    /// Display name of the target language, e.g. `Japanese`.
    pub target_language: String,
    pub batch_size: usize,
    pub custom_prompt: Option<String>,
    pub model: String,
}

/// Drives a [`TranslationCall`] over pending entries, batch by batch.
pub struct BatchTranslator<'a, C: TranslationCall + ?Sized> {
    call: &'a C,
    target_language: String,
    batch_size: usize,
    system_prompt: String,
    model: String,
}

impl<'a, C: TranslationCall + ?Sized> BatchTranslator<'a, C> {
    pub fn new(call: &'a C, settings: BatchSettings) -> Result<Self> {
        if settings.batch_size == 0 {
            return Err(Error::InvalidBatchSize);
        }

        Ok(Self {
            call,
            system_prompt: build_system_prompt(settings.custom_prompt.as_deref()),
            target_language: settings.target_language,
            batch_size: settings.batch_size,
            model: settings.model,
        })
    }

    /// Translates every entry of `pending`, returning `key -> translation` in
    /// the same order.
    ///
    /// Stops at the first failing batch; nothing from that batch is returned.
    pub async fn translate_all<F>(&self, pending: &OrderedStore, mut on_batch: F) -> Result<OrderedStore>
    where
        F: FnMut(BatchProgress),
    {
        let batches = plan_batches(pending, self.batch_size)?;
        let total = batches.len();
        let mut translated = OrderedStore::with_capacity(pending.len());

        for (i, batch) in batches.iter().enumerate() {
            on_batch(BatchProgress {
                index: i + 1,
                total,
                sent: batch.entries.iter().filter(|entry| !entry.blank).count(),
            });

            let results = self.translate_batch(batch).await?;
            for (entry, value) in batch.entries.iter().zip(results) {
                translated.set(entry.key.as_str(), value);
            }
        }

        Ok(translated)
    }

    /// Translates a single batch, returning one value per entry in entry order.
    pub async fn translate_batch(&self, batch: &TranslationBatch) -> Result<Vec<String>> {
        let outgoing = batch.outgoing();

        let mut returned = if outgoing.is_empty() {
            Vec::new().into_iter()
        } else {
            let lines = self
                .call
                .translate(&outgoing, &self.target_language, &self.system_prompt, &self.model)
                .await?;
            if lines.len() != outgoing.len() {
                return Err(Error::TranslationMismatch {
                    expected: outgoing.len(),
                    actual: lines.len(),
                });
            }
            lines.into_iter()
        };

        // Counts match, so every non-blank entry gets exactly one line.
        let results = batch
            .entries
            .iter()
            .map(|entry| {
                if entry.blank {
                    restore_newlines(&entry.text)
                } else {
                    restore_newlines(returned.next().unwrap_or_default().trim())
                }
            })
            .collect();

        Ok(results)
    }
}
