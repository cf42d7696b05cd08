//! Error types for the Almanac event service.

use thiserror::Error;

/// Main error type for Almanac operations.
#[derive(Error, Debug)]
pub enum AlmanacError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Event-store errors (flat-file persistence).
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store file is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Date/time extraction failures.
///
/// Extraction failures are user-correctable: the caller resubmits with
/// more specific text rather than retrying.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractError {
    #[error("Could not determine a date from the input")]
    NoDateFound,
}

/// Result type alias for Almanac operations.
pub type Result<T> = std::result::Result<T, AlmanacError>;
