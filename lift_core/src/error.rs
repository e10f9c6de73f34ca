//! Error types for the lift_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type shared across the replog workspace
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

    /// Malformed message at the serialization boundary
    ///
    /// Fatal for the offending message only; the host drops the message and
    /// the Model is left untouched.
    #[error("decode error: {0}")]
    Decode(String),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Durable store error
    #[error("Store error: {0}")]
    Store(String),
}
