//! Error types for KAGForge components
//!
//! Provides a single error type with:
//! - Distinct variants for construction, loading and adapter failures
//! - Machine-readable error codes
//! - Retry classification for index adapters
//!
//! Expected absence of data (no index, no graph, missing entity, missing path)
//! is never an error in this workspace. Those cases are plain values.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Error codes for machine-readable error identification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors (1xxx)
    ValidationError,
    InvalidFormat,

    // Resource errors (4xxx)
    NotFound,
    EmptyCorpus,

    // Conflict errors (5xxx)
    DuplicateEntity,

    // External collaborator errors (8xxx)
    IndexError,
    IndexUnavailable,

    // Internal errors (9xxx)
    InternalError,
    ConfigurationError,
    SerializationError,
}

impl ErrorCode {
    /// Get the numeric code for this error
    pub fn as_code(&self) -> u16 {
        match self {
            // Validation (1xxx)
            ErrorCode::ValidationError => 1001,
            ErrorCode::InvalidFormat => 1002,

            // Resources (4xxx)
            ErrorCode::NotFound => 4001,
            ErrorCode::EmptyCorpus => 4002,

            // Conflicts (5xxx)
            ErrorCode::DuplicateEntity => 5001,

            // External (8xxx)
            ErrorCode::IndexError => 8001,
            ErrorCode::IndexUnavailable => 8002,

            // Internal (9xxx)
            ErrorCode::InternalError => 9001,
            ErrorCode::ConfigurationError => 9002,
            ErrorCode::SerializationError => 9003,
        }
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    // Resource errors
    #[error("Resource not found: {resource_type} at {id}")]
    NotFound { resource_type: String, id: String },

    #[error("Corpus is empty: {message}")]
    EmptyCorpus { message: String },

    // Conflict errors
    #[error("Duplicate entity: {id}")]
    DuplicateEntity { id: String },

    // External collaborator errors
    #[error("Similarity index error: {message}")]
    Index { message: String },

    #[error("Similarity index unavailable: {message}")]
    IndexUnavailable { message: String },

    // Internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Generic
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { .. } => ErrorCode::ValidationError,
            AppError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
            AppError::NotFound { .. } => ErrorCode::NotFound,
            AppError::EmptyCorpus { .. } => ErrorCode::EmptyCorpus,
            AppError::DuplicateEntity { .. } => ErrorCode::DuplicateEntity,
            AppError::Index { .. } => ErrorCode::IndexError,
            AppError::IndexUnavailable { .. } => ErrorCode::IndexUnavailable,
            AppError::Internal { .. } => ErrorCode::InternalError,
            AppError::Configuration { .. } => ErrorCode::ConfigurationError,
            AppError::Serialization(_) => ErrorCode::SerializationError,
            AppError::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Whether a caller-side retry could succeed.
    ///
    /// Only transient adapter failures qualify. The core itself never retries;
    /// this is for index adapters that wrap remote backends.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::IndexUnavailable { .. })
    }

    /// Errors caused by bad input or data rather than by the environment
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.code().as_code(),
            1000..=1999 | 4000..=5999
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal {
            message: err.to_string(),
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration {
            message: err.to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        let field = err.field_errors().keys().next().map(|f| f.to_string());
        AppError::Validation {
            message: err.to_string(),
            field,
        }
    }
}
