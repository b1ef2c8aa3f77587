//! Error types for the caffeine_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for caffeine_core operations
///
/// The analytics functions never fail; these variants cover the
/// persistence and configuration collaborators around them.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A consumption record failed validation before entering history
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// Drink catalog error (unknown drink, duplicate custom drink)
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
