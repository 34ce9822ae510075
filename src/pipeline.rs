//! One translation run: load, merge, translate what is pending, write.
//!
//! Nothing touches the output file until every batch has succeeded, so a
//! failed run leaves the previous output exactly as it was.

use std::path::PathBuf;

use crate::document::{read_document, read_existing_document, write_document};
use crate::error::Result;
use crate::merge::{MergeOutcome, merge};
use crate::store::OrderedStore;
use crate::translation::{BatchProgress, BatchTranslator, TranslationCall};

/// Receives progress events during [`run`].
pub trait Reporter {
    /// Called once after merging, before any translation request.
    fn planned(&mut self, _pending: usize, _total: usize) {}

    /// Called before each batch is sent.
    fn batch_started(&mut self, _progress: BatchProgress) {}
}

impl Reporter for () {}

/// Source and destination of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// What a completed run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub total_keys: usize,
    pub translated_keys: usize,
    pub document: OrderedStore,
}

impl Job {
    /// Loads the source and any previous output, and merges them.
    pub fn load(&self) -> Result<MergeOutcome> {
        let source = read_document(&self.input)?;
        let existing = read_existing_document(&self.output)?;
        Ok(merge(&source, &existing))
    }
}

/// Translates the pending keys of `outcome` and folds the results back in.
pub async fn translate_pending<C, R>(
    mut outcome: MergeOutcome,
    translator: &BatchTranslator<'_, C>,
    reporter: &mut R,
) -> Result<OrderedStore>
where
    C: TranslationCall + ?Sized,
    R: Reporter + ?Sized,
{
    if !outcome.untranslated.is_empty() {
        let pending = outcome.pending();
        let translated = translator
            .translate_all(&pending, |progress| reporter.batch_started(progress))
            .await?;
        outcome.apply(&translated);
    }
    Ok(outcome.merged)
}

/// Runs `job` end to end.
pub async fn run<C, R>(
    job: &Job,
    translator: &BatchTranslator<'_, C>,
    reporter: &mut R,
) -> Result<RunReport>
where
    C: TranslationCall + ?Sized,
    R: Reporter + ?Sized,
{
    let outcome = job.load()?;
    let total_keys = outcome.merged.len();
    let translated_keys = outcome.untranslated.len();
    reporter.planned(translated_keys, total_keys);

    let document = translate_pending(outcome, translator, reporter).await?;
    write_document(&job.output, &document)?;

    Ok(RunReport {
        total_keys,
        translated_keys,
        document,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::translation::BatchSettings;
    use async_trait::async_trait;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    /// Uppercases every text and counts how many texts it was sent.
    #[derive(Default)]
    struct ShoutingCall {
        sent: AtomicUsize,
    }

    #[async_trait]
    impl TranslationCall for ShoutingCall {
        async fn translate(
            &self,
            texts: &[String],
            _target_language: &str,
            _system_instructions: &str,
            _model: &str,
        ) -> crate::error::Result<Vec<String>> {
            self.sent.fetch_add(texts.len(), Ordering::SeqCst);
            Ok(texts.iter().map(|t| t.to_uppercase()).collect())
        }
    }

    struct FailingCall;

    #[async_trait]
    impl TranslationCall for FailingCall {
        async fn translate(
            &self,
            _texts: &[String],
            _target_language: &str,
            _system_instructions: &str,
            _model: &str,
        ) -> crate::error::Result<Vec<String>> {
            Err(Error::TranslationCallFailure("401 Unauthorized".to_string()))
        }
    }

    #[derive(Default)]
    struct CountingReporter {
        planned: Option<(usize, usize)>,
        batches: usize,
    }

    impl Reporter for CountingReporter {
        fn planned(&mut self, pending: usize, total: usize) {
            self.planned = Some((pending, total));
        }

        fn batch_started(&mut self, _progress: BatchProgress) {
            self.batches += 1;
        }
    }

    fn settings(batch_size: usize) -> BatchSettings {
        BatchSettings {
            target_language: "Shouting".to_string(),
            batch_size,
            custom_prompt: None,
            model: "test-model".to_string(),
        }
    }

    fn job(dir: &TempDir, source: &str) -> Job {
        let input = dir.path().join("en.json");
        fs::write(&input, source).unwrap();
        Job {
            input,
            output: dir.path().join("out").join("xx.json"),
        }
    }

    #[tokio::test]
    async fn test_first_run_translates_everything() {
        let dir = TempDir::new().unwrap();
        let job = job(&dir, r#"{"title": "hello", "body": "<b>bold</b>\nnext"}"#);
        let call = ShoutingCall::default();
        let translator = BatchTranslator::new(&call, settings(100)).unwrap();
        let mut reporter = CountingReporter::default();

        let report = run(&job, &translator, &mut reporter).await.unwrap();

        assert_eq!(report.translated_keys, 2);
        assert_eq!(reporter.planned, Some((2, 2)));
        assert_eq!(reporter.batches, 1);
        assert_eq!(
            fs::read_to_string(&job.output).unwrap(),
            "{\n  \"title\": \"HELLO\",\n  \"body\": \"<B>BOLD</B>\\nNEXT\"\n}\n"
        );
    }

    #[tokio::test]
    async fn test_second_run_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let job = job(&dir, r#"{"a": "one", "b": "two", "c": "three"}"#);
        let call = ShoutingCall::default();
        let translator = BatchTranslator::new(&call, settings(2)).unwrap();

        run(&job, &translator, &mut ()).await.unwrap();
        let first = fs::read_to_string(&job.output).unwrap();
        assert_eq!(call.sent.load(Ordering::SeqCst), 3);

        let mut reporter = CountingReporter::default();
        let report = run(&job, &translator, &mut reporter).await.unwrap();

        assert_eq!(report.translated_keys, 0);
        assert_eq!(reporter.batches, 0);
        assert_eq!(call.sent.load(Ordering::SeqCst), 3);
        assert_eq!(fs::read_to_string(&job.output).unwrap(), first);
    }

    #[tokio::test]
    async fn test_new_and_removed_keys() {
        let dir = TempDir::new().unwrap();
        let job = job(&dir, r#"{"keep": "keep", "new": "new"}"#);
        fs::create_dir_all(job.output.parent().unwrap()).unwrap();
        fs::write(&job.output, r#"{"gone": "GONE", "keep": "KEPT"}"#).unwrap();
        let call = ShoutingCall::default();
        let translator = BatchTranslator::new(&call, settings(10)).unwrap();

        let report = run(&job, &translator, &mut ()).await.unwrap();

        assert_eq!(call.sent.load(Ordering::SeqCst), 1);
        assert_eq!(
            report.document.iter().collect::<Vec<_>>(),
            [("keep", "KEPT"), ("new", "NEW")]
        );
    }

    #[tokio::test]
    async fn test_failed_translation_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let job = job(&dir, r#"{"a": "one"}"#);
        let translator = BatchTranslator::new(&FailingCall, settings(10)).unwrap();

        let err = run(&job, &translator, &mut ()).await.unwrap_err();

        assert!(matches!(err, Error::TranslationCallFailure(_)));
        assert!(!job.output.exists());
    }

    #[tokio::test]
    async fn test_missing_input_is_error() {
        let dir = TempDir::new().unwrap();
        let job = Job {
            input: dir.path().join("missing.json"),
            output: dir.path().join("fr.json"),
        };
        let translator = BatchTranslator::new(&FailingCall, settings(10)).unwrap();

        let err = run(&job, &translator, &mut ()).await.unwrap_err();

        assert!(matches!(err, Error::FileSystem { .. }));
    }

    #[tokio::test]
    async fn test_malformed_existing_output_is_error() {
        let dir = TempDir::new().unwrap();
        let job = job(&dir, r#"{"a": "one"}"#);
        fs::create_dir_all(job.output.parent().unwrap()).unwrap();
        fs::write(&job.output, r#"{"a": ["not", "flat"]}"#).unwrap();
        let translator = BatchTranslator::new(&FailingCall, settings(10)).unwrap();

        let err = run(&job, &translator, &mut ()).await.unwrap_err();

        assert!(matches!(err, Error::MalformedDocument { .. }));
    }

    #[tokio::test]
    async fn test_empty_source_writes_empty_document() {
        let dir = TempDir::new().unwrap();
        let job = job(&dir, "{}");
        let translator = BatchTranslator::new(&FailingCall, settings(10)).unwrap();

        let report = run(&job, &translator, &mut ()).await.unwrap();

        assert_eq!(report.total_keys, 0);
        assert_eq!(fs::read_to_string(&job.output).unwrap(), "{\n}\n");
    }
}
