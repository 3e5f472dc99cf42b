//! Error types for the tracker.
//!
//! Query failures are not errors at the run level: the dispatcher converts
//! [`QueryError`] into a failed outcome. The other types surface to `main`.

use std::path::PathBuf;
use thiserror::Error;

/// Startup configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is unset or empty.
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// The config file contains a value the tracker cannot run with.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// A single platform query failed.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The body parsed but the generated text was not where expected.
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Report delivery failed.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("webhook request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("webhook returned {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Snapshot persistence errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid snapshot {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
