//! Configuration: CLI overrides, environment, `.env` and config file.

mod dotenv;
mod manager;

pub use dotenv::load_env_file;
pub use manager::{
    ConfigFile, ConfigManager, DEFAULT_BATCH_SIZE, DEFAULT_ENDPOINT, DEFAULT_MODEL,
    DEFAULT_TIMEOUT_SECS, EnvConfig, ResolveOptions, ResolvedConfig, TranslatorConfig,
    resolve_config,
};

/// Context attached to every error raised while assembling the configuration,
/// so callers can tell configuration problems apart from run failures.
#[derive(Debug, thiserror::Error)]
#[error("Invalid configuration")]
pub struct ConfigurationError;
