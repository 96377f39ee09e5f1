//! Error types for the collaborator layer (sources, configuration, output).
//!
//! The decoding core never fails with an error: a segment or buffer that holds
//! no key yields `None`. These errors cover everything around it.

use thiserror::Error;

/// The primary error type for all fallible operations in this crate.
#[derive(Debug, Error)]
pub enum KeyError {
    /// An error originating from I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be loaded or failed validation.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// A key source could not produce its candidates.
    #[error("source '{source_name}' failed: {message}")]
    SourceError {
        source_name: String,
        message: String,
    },

    /// A hex-encoded blob could not be decoded.
    #[error("invalid hex input: {0}")]
    InvalidHex(String),

    /// The report could not be rendered or written.
    #[error("output error: {0}")]
    OutputError(String),

    /// JSON rendering failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A convenience `Result` type alias using the crate's `KeyError` type.
pub type KeyResult<T> = std::result::Result<T, KeyError>;
