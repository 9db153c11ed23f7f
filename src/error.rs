/// Error types shared across the application
///
/// Errors that ride inside iced messages must be `Clone`, so I/O sources
/// are wrapped in `Arc` and transport errors are carried as text.

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Failure to turn a user-selected file into inline image data
#[derive(Debug, Clone, Error)]
pub enum EncodeError {
    #[error("could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: Arc<std::io::Error>,
    },

    #[error("not a base64 data URI: {0}")]
    InvalidDataUri(String),

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Failure reported by the AI gateway
///
/// The gateway carries no structured error codes: callers only learn
/// that a call failed and why, in words.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GatewayError {
    #[error("API key not found in ${0}")]
    MissingApiKey(String),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("service error ({status}): {message}")]
    Service { status: u16, message: String },

    #[error("unexpected response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Transport(err.to_string())
    }
}

/// Failure in the on-disk library
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("could not create library directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored tags are not valid JSON: {0}")]
    Tags(#[from] serde_json::Error),

    #[error("stored timestamp is invalid: {0}")]
    Timestamp(#[from] chrono::ParseError),

    #[error("stored image is invalid: {0}")]
    Image(#[from] EncodeError),
}

/// Failure while loading the configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}
