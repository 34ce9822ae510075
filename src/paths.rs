//! Path resolution for the configuration file and translated output.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

const APP_DIR: &str = "json-translator";

/// Returns the configuration directory.
///
/// Resolution order:
/// 1. `$XDG_CONFIG_HOME/json-translator` if `XDG_CONFIG_HOME` is set
/// 2. `~/.config/json-translator` otherwise
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME")
        && !xdg.is_empty()
    {
        return Ok(PathBuf::from(xdg).join(APP_DIR));
    }

    let home = dirs::home_dir().context("Failed to determine home directory")?;
    Ok(home.join(".config").join(APP_DIR))
}

/// Where the translation of `input` into `language` is written.
///
/// `output_dir` defaults to the input's directory and `filename` (without
/// extension) defaults to the language code.
pub fn output_file(
    input: &Path,
    language: &str,
    output_dir: Option<&Path>,
    filename: Option<&str>,
) -> PathBuf {
    let dir = output_dir.map_or_else(
        || input.parent().map(Path::to_path_buf).unwrap_or_default(),
        Path::to_path_buf,
    );
    let name = filename.filter(|name| !name.is_empty()).unwrap_or(language);
    dir.join(format!("{name}.json"))
}
