//! `.env` file loading.

use anyhow::{Context, Result};
use std::io;
use std::path::Path;

/// Loads variables from a `.env` file into the process environment.
///
/// Variables already set in the environment are left untouched. A missing
/// file is only an error when the path was given explicitly. Returns whether
/// a file was loaded.
pub fn load_env_file(path: &Path, explicit: bool) -> Result<bool> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(dotenvy::Error::Io(err)) if err.kind() == io::ErrorKind::NotFound && !explicit => {
            Ok(false)
        }
        Err(err) => {
            Err(err).with_context(|| format!("Error loading .env file: {}", path.display()))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_default_env_file_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let loaded = load_env_file(&temp_dir.path().join(".env"), false).unwrap();
        assert!(!loaded);
    }

    #[test]
    fn test_missing_explicit_env_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = load_env_file(&temp_dir.path().join("prod.env"), true).unwrap_err();
        assert!(err.to_string().contains("Error loading .env file"));
    }

    #[test]
    #[serial]
    fn test_env_file_sets_variables() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".env");
        fs::write(&path, "JSON_TRANSLATOR_TEST_PROMPT=\"Be concise.\"\n").unwrap();

        assert!(load_env_file(&path, true).unwrap());
        assert_eq!(
            std::env::var("JSON_TRANSLATOR_TEST_PROMPT").unwrap(),
            "Be concise."
        );

        // SAFETY: test-specific variable, tests touching the environment are serialized
        unsafe { std::env::remove_var("JSON_TRANSLATOR_TEST_PROMPT") };
    }
}
