//! Error types for file discovery and configuration loading.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestionError {
    #[error("failed to read config file: {0}")]
    ConfigRead(#[from] std::io::Error),

    #[error("failed to parse config YAML: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("missing required config key: {0}")]
    MissingConfigKey(String),

    #[error("pressure observation line is malformed: {0}")]
    MalformedPressureLine(String),

    #[error("ATCF record is malformed: {0}")]
    MalformedAtcfLine(String),

    #[error("failed to load radar volume from {path}: {reason}")]
    VolumeLoad { path: String, reason: String },
}

pub type Result<T> = std::result::Result<T, IngestionError>;
