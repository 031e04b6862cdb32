//! Error types for the gonit client
//!
//! Connection and I/O failures keep the underlying `io::Error`. Everything the
//! daemon reports, and every response that cannot be decoded, is an `RpcError`.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the gonit client
#[derive(Error, Debug)]
pub enum Error {
    // === Connection Errors ===
    #[error("Failed to connect to gonit at {endpoint}: {source}. Is the daemon running?")]
    Connect {
        endpoint: String,
        #[source]
        source: io::Error,
    },

    #[error("Invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    // === Protocol Errors ===
    #[error(transparent)]
    Rpc(#[from] RpcError),

    // === Configuration Errors ===
    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an invalid endpoint error
    pub fn invalid_endpoint(endpoint: &str, reason: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: reason.into(),
        }
    }

    /// The RPC error carried by this error, if the daemon (or its response) was at fault
    pub fn as_rpc(&self) -> Option<&RpcError> {
        match self {
            Self::Rpc(e) => Some(e),
            _ => None,
        }
    }
}

/// Error reported by the daemon, or a response that could not be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RpcError {
    /// The response line was not a JSON object
    #[error("parsing response `{raw}': {reason}")]
    Parse { raw: String, reason: String },

    /// The daemon answered with a non-empty `error` field
    #[error("{0}")]
    Server(String),
}

impl RpcError {
    /// Human-readable message, as shown to the user
    pub fn message(&self) -> String {
        self.to_string()
    }
}
