//! Domain-specific error types for safeline

use thiserror::Error;

/// Main error type for the safeline assessment service
#[derive(Error, Debug)]
pub enum SafelineError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Embedding provider error: {message}")]
    Embedding { message: String },

    #[error("Topic model error: {message}")]
    TopicModel { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<anyhow::Error> for SafelineError {
    fn from(err: anyhow::Error) -> Self {
        SafelineError::Internal {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for SafelineError {
    fn from(err: serde_json::Error) -> Self {
        SafelineError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<surrealdb::Error> for SafelineError {
    fn from(err: surrealdb::Error) -> Self {
        SafelineError::Database {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for SafelineError {
    fn from(err: reqwest::Error) -> Self {
        SafelineError::Internal {
            message: format!("HTTP request failed: {}", err),
        }
    }
}

/// Result type alias for safeline operations
pub type Result<T> = std::result::Result<T, SafelineError>;
