use thiserror::Error;

/// Custom Result type for this crate.
pub type Result<T> = std::result::Result<T, LensError>;

/// The Error type for dataset loading and configuration.
///
/// Row-level defects (missing fields, bad dates, bad scores) are absorbed by the
/// stage that meets them and never surface here.
#[derive(Error, Debug)]
pub enum LensError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Configuration validation error: {0}")]
    ConfigValidationError(String),

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("CSV parsing error: {source}")]
    CsvError {
        #[from]
        source: csv::Error,
    },

    #[error("HTTP error: {source}")]
    HttpError {
        #[from]
        source: reqwest::Error,
    },

    #[error("Serialization/Deserialization error: {source}")]
    SerializationError {
        #[from]
        source: serde_json::Error,
    },

    #[error("Failed to load dataset from '{origin}': {reason}")]
    LoadFailed { origin: String, reason: String },

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}
