//! Error types for the sma_core library.
//!
//! The risk engines themselves are total and never fail; these errors come
//! from parsing user input, configuration and the usage counter store.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for sma_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Carrier status outside healthy/carrier/affected/unknown
    #[error("Invalid status '{0}' (expected healthy, carrier, affected or unknown)")]
    InvalidStatus(String),

    /// Checklist field name that does not exist
    #[error("Unknown checklist field '{0}'")]
    UnknownFinding(String),

    /// Malformed user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Usage counter store error
    #[error("Usage counter error: {0}")]
    Usage(String),
}
