//! Error types for loading log sources and configuration.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read log source: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to read archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Neither a `.log` file nor a `.zip` archive.
    #[error("unsupported file '{0}': expected a .log file or a .zip archive")]
    UnsupportedFile(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
