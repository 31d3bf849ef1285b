//! Error types for siteeval

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using siteeval Error
pub type Result<T> = std::result::Result<T, Error>;

/// siteeval error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config file error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Config encode error: {0}")]
    TomlEncode(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Query file {path} is malformed: {reason}")]
    QueryParse { path: PathBuf, reason: String },
}
