use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Crate-level error type.
///
/// The taxonomy is intentionally small: terminal/config I/O, JSON codec
/// failures around the config store, and the assistant's single network
/// call. Registry access cannot fail at runtime; window identifiers are a
/// closed enum.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("failed to read {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {path}: {source}")]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to decode {path}: {source}")]
    ConfigDecode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode {name}: {source}")]
    ConfigEncode {
        name: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("assistant request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("assistant returned a response with no completion text")]
    EmptyCompletion,
}

pub type Result<T> = std::result::Result<T, ShellError>;
