use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crate::paths;
use crate::translation::code_to_language_name;

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_BATCH_SIZE: usize = 100;
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Settings in the `[translator]` section of config.toml.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatorConfig {
    /// Default model name.
    pub model: Option<String>,
    /// OpenAI-compatible API base URL.
    pub endpoint: Option<String>,
    /// Number of texts per translation request.
    pub batch_size: Option<usize>,
    /// Extra instructions appended to the system prompt.
    pub custom_prompt: Option<String>,
    /// API key stored directly in config (not recommended).
    pub api_key: Option<String>,
    /// Environment variable name containing the API key.
    pub api_key_env: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

/// The complete configuration file structure.
///
/// Corresponds to `~/.config/json-translator/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub translator: TranslatorConfig,
}

/// Values taken from the process environment (after `.env` loading).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvConfig {
    /// `OPENAI_API_KEY`
    pub api_key: Option<String>,
    /// `OPENAI_API_ENDPOINT`
    pub endpoint: Option<String>,
    /// `CUSTOM_PROMPT`
    pub custom_prompt: Option<String>,
    /// `TRANSLATOR_MODEL`
    pub model: Option<String>,
    /// Key read from the variable named by `api_key_env` in the config file.
    pub named_api_key: Option<String>,
}

impl EnvConfig {
    /// Reads the supported variables from the process environment.
    pub fn from_env(config_file: &ConfigFile) -> Self {
        Self::from_lookup(config_file, |name| std::env::var(name).ok())
    }

    /// Reads the supported variables through `lookup`. Empty values count as unset.
    pub fn from_lookup<F>(config_file: &ConfigFile, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.is_empty());

        Self {
            api_key: get("OPENAI_API_KEY"),
            endpoint: get("OPENAI_API_ENDPOINT"),
            custom_prompt: get("CUSTOM_PROMPT"),
            model: get("TRANSLATOR_MODEL"),
            named_api_key: config_file
                .translator
                .api_key_env
                .as_deref()
                .and_then(get),
        }
    }
}

/// CLI overrides; these take precedence over everything else.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Target language code.
    pub language: String,
    pub model: Option<String>,
    pub endpoint: Option<String>,
    pub batch_size: Option<usize>,
    pub timeout_secs: Option<u64>,
}

/// Settings for one run after merging CLI, environment and config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Target language code as given (also the default output file name).
    pub language_code: String,
    /// Display name sent to the model, e.g. `Japanese`.
    pub language_name: String,
    pub model: String,
    pub endpoint: String,
    pub api_key: String,
    pub batch_size: usize,
    pub custom_prompt: Option<String>,
    pub timeout: Duration,
}

/// Resolves configuration: CLI options, then environment, then config file,
/// then built-in defaults.
///
/// # Errors
///
/// Returns an error if the language code is unknown, the batch size is zero
/// or no API key can be found.
pub fn resolve_config(
    options: &ResolveOptions,
    env: &EnvConfig,
    config_file: &ConfigFile,
) -> Result<ResolvedConfig> {
    let file = &config_file.translator;

    let language_name = code_to_language_name(&options.language)?;

    let model = options
        .model
        .as_ref()
        .or(env.model.as_ref())
        .or(file.model.as_ref())
        .cloned()
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    let endpoint = options
        .endpoint
        .as_ref()
        .or(env.endpoint.as_ref())
        .or(file.endpoint.as_ref())
        .cloned()
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

    let batch_size = options
        .batch_size
        .or(file.batch_size)
        .unwrap_or(DEFAULT_BATCH_SIZE);
    if batch_size == 0 {
        bail!("Invalid batch size: 0\n\nThe batch size must be a positive integer.");
    }

    let custom_prompt = env
        .custom_prompt
        .as_ref()
        .or(file.custom_prompt.as_ref())
        .filter(|prompt| !prompt.trim().is_empty())
        .cloned();

    let timeout_secs = options
        .timeout_secs
        .or(file.timeout_secs)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);

    let api_key = env
        .named_api_key
        .as_ref()
        .or(env.api_key.as_ref())
        .or(file.api_key.as_ref())
        .cloned()
        .ok_or_else(|| {
            let env_var = file.api_key_env.as_deref().unwrap_or("OPENAI_API_KEY");
            anyhow::anyhow!(
                "Missing API key\n\n\
                 Set the {env_var} environment variable or add it to your .env file:\n  \
                 {env_var}=\"your-api-key\"\n\n\
                 Or set api_key in ~/.config/json-translator/config.toml"
            )
        })?;

    Ok(ResolvedConfig {
        language_code: options.language.clone(),
        language_name,
        model,
        endpoint,
        api_key,
        batch_size,
        custom_prompt,
        timeout: Duration::from_secs(timeout_secs),
    })
}

/// Loads the optional configuration file.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a new config manager.
    ///
    /// Configuration is read from `$XDG_CONFIG_HOME/json-translator/config.toml`
    /// or `~/.config/json-translator/config.toml` if `XDG_CONFIG_HOME` is not set.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_path: paths::config_dir()?.join("config.toml"),
        })
    }

    pub const fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Loads the config file; a missing file yields the defaults.
    pub fn load_or_default(&self) -> Result<ConfigFile> {
        let contents = match fs::read_to_string(&self.config_path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(ConfigFile::default());
            }
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("Failed to read config file: {}", self.config_path.display())
                });
            }
        };

        toml::from_str(&contents).with_context(|| {
            format!(
                "Failed to parse config file: {}",
                self.config_path.display()
            )
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn create_test_manager(temp_dir: &TempDir) -> ConfigManager {
        ConfigManager {
            config_path: temp_dir.path().join("config.toml"),
        }
    }

    fn options(language: &str) -> ResolveOptions {
        ResolveOptions {
            language: language.to_string(),
            ..Default::default()
        }
    }

    fn env_with_key() -> EnvConfig {
        EnvConfig {
            api_key: Some("sk-env".to_string()),
            ..Default::default()
        }
    }

    fn config_file() -> ConfigFile {
        ConfigFile {
            translator: TranslatorConfig {
                model: Some("file-model".to_string()),
                endpoint: Some("http://file.local/v1".to_string()),
                batch_size: Some(50),
                custom_prompt: Some("File prompt.".to_string()),
                api_key: Some("sk-file".to_string()),
                api_key_env: None,
                timeout_secs: Some(30),
            },
        }
    }

    #[test]
    fn test_load_missing_config_is_default() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);

        assert_eq!(manager.load_or_default().unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_load_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        fs::write(
            manager.config_path(),
            "[translator]\nmodel = \"gpt-4o\"\nbatch_size = 25\napi_key_env = \"MY_KEY\"\n",
        )
        .unwrap();

        let config = manager.load_or_default().unwrap();

        assert_eq!(config.translator.model, Some("gpt-4o".to_string()));
        assert_eq!(config.translator.batch_size, Some(25));
        assert_eq!(config.translator.api_key_env, Some("MY_KEY".to_string()));
        assert!(config.translator.endpoint.is_none());
    }

    #[test]
    fn test_load_malformed_config_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        fs::write(manager.config_path(), "[translator]\nbatch_size = \"many\"\n").unwrap();

        let err = manager.load_or_default().unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_env_from_lookup_ignores_empty_values() {
        let vars: HashMap<&str, &str> = [
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_API_ENDPOINT", ""),
            ("CUSTOM_PROMPT", "Keep brand names in English."),
        ]
        .into_iter()
        .collect();

        let env = EnvConfig::from_lookup(&ConfigFile::default(), |name| {
            vars.get(name).map(|v| (*v).to_string())
        });

        assert_eq!(env.api_key, Some("sk-test".to_string()));
        assert!(env.endpoint.is_none());
        assert_eq!(
            env.custom_prompt,
            Some("Keep brand names in English.".to_string())
        );
    }

    #[test]
    fn test_env_reads_named_api_key() {
        let mut file = ConfigFile::default();
        file.translator.api_key_env = Some("OPENROUTER_API_KEY".to_string());

        let env = EnvConfig::from_lookup(&file, |name| {
            (name == "OPENROUTER_API_KEY").then(|| "sk-or".to_string())
        });

        assert_eq!(env.named_api_key, Some("sk-or".to_string()));
        assert!(env.api_key.is_none());
    }

    #[test]
    fn test_resolve_defaults() {
        let resolved =
            resolve_config(&options("ja"), &env_with_key(), &ConfigFile::default()).unwrap();

        assert_eq!(resolved.language_code, "ja");
        assert_eq!(resolved.language_name, "Japanese");
        assert_eq!(resolved.model, DEFAULT_MODEL);
        assert_eq!(resolved.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(resolved.batch_size, DEFAULT_BATCH_SIZE);
        assert_eq!(resolved.api_key, "sk-env");
        assert!(resolved.custom_prompt.is_none());
        assert_eq!(resolved.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_resolve_falls_back_to_file() {
        let resolved =
            resolve_config(&options("fr"), &EnvConfig::default(), &config_file()).unwrap();

        assert_eq!(resolved.model, "file-model");
        assert_eq!(resolved.endpoint, "http://file.local/v1");
        assert_eq!(resolved.batch_size, 50);
        assert_eq!(resolved.custom_prompt, Some("File prompt.".to_string()));
        assert_eq!(resolved.api_key, "sk-file");
        assert_eq!(resolved.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_resolve_env_overrides_file() {
        let env = EnvConfig {
            api_key: Some("sk-env".to_string()),
            endpoint: Some("http://env.local/v1".to_string()),
            custom_prompt: Some("Env prompt.".to_string()),
            model: Some("env-model".to_string()),
            named_api_key: None,
        };

        let resolved = resolve_config(&options("fr"), &env, &config_file()).unwrap();

        assert_eq!(resolved.model, "env-model");
        assert_eq!(resolved.endpoint, "http://env.local/v1");
        assert_eq!(resolved.custom_prompt, Some("Env prompt.".to_string()));
        assert_eq!(resolved.api_key, "sk-env");
    }

    #[test]
    fn test_resolve_cli_overrides_everything() {
        let env = EnvConfig {
            model: Some("env-model".to_string()),
            endpoint: Some("http://env.local/v1".to_string()),
            ..env_with_key()
        };
        let options = ResolveOptions {
            language: "de".to_string(),
            model: Some("cli-model".to_string()),
            endpoint: Some("http://cli.local/v1".to_string()),
            batch_size: Some(7),
            timeout_secs: Some(5),
        };

        let resolved = resolve_config(&options, &env, &config_file()).unwrap();

        assert_eq!(resolved.model, "cli-model");
        assert_eq!(resolved.endpoint, "http://cli.local/v1");
        assert_eq!(resolved.batch_size, 7);
        assert_eq!(resolved.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_resolve_named_key_wins() {
        let env = EnvConfig {
            named_api_key: Some("sk-named".to_string()),
            ..env_with_key()
        };

        let resolved = resolve_config(&options("es"), &env, &config_file()).unwrap();
        assert_eq!(resolved.api_key, "sk-named");
    }

    #[test]
    fn test_resolve_missing_api_key() {
        let err = resolve_config(&options("ja"), &EnvConfig::default(), &ConfigFile::default())
            .unwrap_err();
        assert!(err.to_string().contains("Missing API key"));
    }

    #[test]
    fn test_resolve_zero_batch_size() {
        let mut options = options("ja");
        options.batch_size = Some(0);

        let err = resolve_config(&options, &env_with_key(), &ConfigFile::default()).unwrap_err();
        assert!(err.to_string().contains("batch size"));
    }

    #[test]
    fn test_resolve_invalid_language() {
        let err = resolve_config(&options("klingon"), &env_with_key(), &ConfigFile::default())
            .unwrap_err();
        assert!(err.to_string().contains("Invalid language code"));
    }
}
