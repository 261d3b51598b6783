use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration source error: {0}")]
    ConfigSource(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Source missing: {}", .0.display())]
    MissingSource(PathBuf),

    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("Metadata read failure: {0}")]
    MetadataRead(String),

    #[error("Metadata write failure: {0}")]
    MetadataWrite(String),

    #[error("Copy failed for {}: {}", .path.display(), .source)]
    CopyFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
