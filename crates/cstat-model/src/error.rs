use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
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
    #[error("missing {field} in pipeline config")]
    MissingField { field: &'static str },
    #[error("delimiter must be a single ASCII character, got {0:?}")]
    InvalidDelimiter(String),
    #[error("{first} and {second} inputs point to the same file: {path}")]
    SharedInput {
        first: &'static str,
        second: &'static str,
        path: PathBuf,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
