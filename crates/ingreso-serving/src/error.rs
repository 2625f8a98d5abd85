//! Error types for the ingreso-serving crate.
//!
//! This module defines all error types used by the artifact loader, the
//! prediction path, and the HTTP server.

use std::path::Path;
use thiserror::Error;

/// Result type alias for serving operations.
pub type ServingResult<T> = Result<T, ServingError>;

/// Errors that can occur in the serving infrastructure.
#[derive(Debug, Error)]
pub enum ServingError {
    /// A scaler or model artifact could not be read or is inconsistent.
    #[error("Failed to load artifact {path}: {reason}")]
    ArtifactLoad {
        /// File the artifact was read from
        path: String,
        /// What went wrong
        reason: String,
    },

    /// A required form field was not submitted.
    #[error("missing form field '{0}'")]
    MissingField(String),

    /// A form field could not be converted to an integer.
    #[error("invalid integer for field '{field}': '{value}'")]
    InvalidField {
        /// Name of the offending field
        field: String,
        /// Raw submitted value
        value: String,
    },

    /// The form body itself could not be decoded.
    #[error("unreadable form submission: {0}")]
    InvalidForm(String),

    /// Input length does not match what a scaler or model was fitted on.
    #[error("{component} expects {expected} features, got {actual}")]
    DimensionMismatch {
        /// Which artifact rejected the input
        component: &'static str,
        /// Feature count the artifact was fitted on
        expected: usize,
        /// Feature count that was supplied
        actual: usize,
    },

    /// Prediction failed.
    #[error("Prediction failed: {0}")]
    PredictionError(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Server error.
    #[error("Server error: {0}")]
    ServerError(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ServingError {
    /// Create an artifact load error for the given file.
    pub fn artifact_load(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self::ArtifactLoad {
            path: path.as_ref().display().to_string(),
            reason: reason.into(),
        }
    }

    /// Create a missing field error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField(field.into())
    }

    /// Create an invalid field error.
    pub fn invalid_field(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create a dimension mismatch error.
    pub fn dimension_mismatch(component: &'static str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            component,
            expected,
            actual,
        }
    }

    /// Create a prediction error.
    pub fn prediction(msg: impl Into<String>) -> Self {
        Self::PredictionError(msg.into())
    }

    /// Create a config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create a server error.
    pub fn server(msg: impl Into<String>) -> Self {
        Self::ServerError(msg.into())
    }

    /// Check if this error was caused by the submitted form rather than the
    /// loaded artifacts.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingField(_) | Self::InvalidField { .. } | Self::InvalidForm(_)
        )
    }
}

impl From<crate::config::ConfigError> for ServingError {
    fn from(err: crate::config::ConfigError) -> Self {
        Self::config(err.to_string())
    }
}
