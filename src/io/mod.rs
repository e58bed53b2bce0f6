pub mod config_io;
pub mod snapshot_io;

use std::path::PathBuf;

/// Error type for reading and writing editor files
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config: {0}")]
    ConfigParseError(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("could not parse {path}: {source}")]
    JsonError {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid tree in {path}: {source}")]
    InvalidTree {
        path: PathBuf,
        source: crate::model::tree::TreeError,
    },
}
