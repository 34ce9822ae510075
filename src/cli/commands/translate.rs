use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::config::{
    ConfigManager, ConfigurationError, EnvConfig, ResolveOptions, load_env_file, resolve_config,
};
use crate::paths;
use crate::pipeline::{self, Job, Reporter};
use crate::translation::{BatchProgress, BatchSettings, BatchTranslator, TranslationClient};
use crate::ui::{Spinner, Style};
use crate::{debug, status};

const DEFAULT_ENV_FILE: &str = ".env";

pub struct TranslateOptions {
    pub input: PathBuf,
    pub language: String,
    pub batch_size: Option<usize>,
    /// `None` means the default `.env`, which may be absent.
    pub env_file: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub filename: Option<String>,
    pub model: Option<String>,
    pub endpoint: Option<String>,
    pub timeout: Option<u64>,
}

pub async fn run_translate(options: TranslateOptions) -> Result<()> {
    let env_file = options
        .env_file
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ENV_FILE));
    if load_env_file(&env_file, options.env_file.is_some()).context(ConfigurationError)? {
        debug!("Loaded environment from {}", env_file.display());
    }

    let manager = ConfigManager::new()?;
    let config_file = manager.load_or_default().context(ConfigurationError)?;
    let env = EnvConfig::from_env(&config_file);

    let config = resolve_config(
        &ResolveOptions {
            language: options.language.clone(),
            model: options.model,
            endpoint: options.endpoint,
            batch_size: options.batch_size,
            timeout_secs: options.timeout,
        },
        &env,
        &config_file,
    )
    .context(ConfigurationError)?;

    let job = Job {
        output: paths::output_file(
            &options.input,
            &config.language_code,
            options.output_dir.as_deref(),
            options.filename.as_deref(),
        ),
        input: options.input,
    };

    debug!(
        "Endpoint {}, model {}, batch size {}, timeout {:?}",
        config.endpoint, config.model, config.batch_size, config.timeout
    );

    let client = TranslationClient::new(config.endpoint, config.api_key, config.timeout)?;
    let translator = BatchTranslator::new(
        &client,
        BatchSettings {
            target_language: config.language_name.clone(),
            batch_size: config.batch_size,
            custom_prompt: config.custom_prompt,
            model: config.model,
        },
    )?;

    let mut reporter = ProgressReporter::new(config.language_name);
    let report = pipeline::run(&job, &translator, &mut reporter).await?;
    reporter.finish();

    debug!(
        "{} of {} keys translated",
        report.translated_keys, report.total_keys
    );

    println!(
        "{} Output saved to {}",
        Style::success("Translation complete."),
        Style::path(job.output.display())
    );

    Ok(())
}

/// Prints the merge summary and drives a spinner while batches are in flight.
struct ProgressReporter {
    language_name: String,
    spinner: Option<Spinner>,
}

impl ProgressReporter {
    const fn new(language_name: String) -> Self {
        Self {
            language_name,
            spinner: None,
        }
    }

    fn finish(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.stop();
        }
    }
}

impl Reporter for ProgressReporter {
    fn planned(&mut self, pending: usize, total: usize) {
        if pending == 0 {
            status!(
                "All {} keys are already translated into {}",
                Style::value(total),
                Style::value(&self.language_name)
            );
        } else {
            status!(
                "{} of {} keys need translation into {}",
                Style::value(pending),
                Style::value(total),
                Style::value(&self.language_name)
            );
        }
    }

    fn batch_started(&mut self, progress: BatchProgress) {
        let message = format!(
            "Translating batch {}/{} ({} texts)...",
            progress.index, progress.total, progress.sent
        );
        match &self.spinner {
            Some(spinner) => spinner.set_message(message),
            None => self.spinner = Some(Spinner::new(&message)),
        }
    }
}
