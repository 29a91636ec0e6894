//! Error types for the conversation core and its collaborators.

use std::time::Duration;

/// Failures of the persistence collaborator.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
}

/// Failures of the scoring oracle. Always absorbed by the matching engine.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("Oracle not configured: {0}")]
    NotConfigured(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Oracle returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Oracle timed out after {0:?}")]
    Timeout(Duration),

    #[error("Oracle response had no text")]
    EmptyResponse,

    #[error("Malformed oracle response: {0}")]
    Malformed(String),
}

/// Failures of the outbound message transport. Logged, never surfaced.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Failed to deliver to {to}: {reason}")]
    Delivery { to: String, reason: String },
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}
