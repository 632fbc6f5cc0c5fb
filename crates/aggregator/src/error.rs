use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AggregatorError>;

/// Errors surfaced while loading or validating aggregator configuration.
///
/// Aggregation itself never returns these: missing paths, unreadable files
/// and walk failures are absorbed and only reduce the produced context.
#[derive(Error, Debug)]
pub enum AggregatorError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigError(String),

    #[error("Working directory must be absolute: {}", .0.display())]
    InvalidWorkingDir(PathBuf),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl AggregatorError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
