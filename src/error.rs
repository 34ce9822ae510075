//! Error types shared by the document, merge and translation layers.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while loading, translating or writing a document.
#[derive(Debug, Error)]
pub enum Error {
    /// The file is not a flat JSON object of string values.
    #[error("Malformed JSON document {}: {message}", path.display())]
    MalformedDocument { path: PathBuf, message: String },

    /// The translation API could not be reached or rejected the request.
    #[error("Translation call failed: {0}")]
    TranslationCallFailure(String),

    /// The model returned a different number of lines than it was sent.
    #[error("Translation mismatch: got {actual} translations for {expected} texts")]
    TranslationMismatch { expected: usize, actual: usize },

    /// Reading the input or writing the output failed.
    #[error("File system error at {}: {source}", path.display())]
    FileSystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Batch size must be at least one.
    #[error("Invalid batch size: must be a positive integer")]
    InvalidBatchSize,
}

impl Error {
    pub(crate) fn file_system(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::FileSystem {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::MalformedDocument {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Maps the error kind to a sysexits-style process exit code.
    pub const fn exit_code(&self) -> exitcode::ExitCode {
        match self {
            Self::MalformedDocument { .. } | Self::TranslationMismatch { .. } => exitcode::DATAERR,
            Self::TranslationCallFailure(_) => exitcode::UNAVAILABLE,
            Self::FileSystem { .. } => exitcode::IOERR,
            Self::InvalidBatchSize => exitcode::CONFIG,
        }
    }
}

/// Result alias for operations that fail with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
