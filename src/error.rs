//! Error types for Companion
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Companion operations
///
/// This enum encompasses all possible errors that can occur during
/// configuration loading, chat persistence, and generation backend
/// interactions.
#[derive(Error, Debug)]
pub enum CompanionError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The generation backend could not be reached (connection refused,
    /// DNS failure, timeout)
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The generation backend answered with a non-success status
    #[error("Backend error: status={status}, {message}")]
    BackendStatus {
        /// HTTP status code returned by the backend
        status: u16,
        /// Response body or additional context
        message: String,
    },

    /// Chat session persistence errors (corrupt file, write failure)
    #[error("Storage error: {0}")]
    Storage(String),

    /// A session operation referenced an unknown session id
    #[error("Unknown session: {0}")]
    UnknownSession(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Companion operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
