//! Error types for adapter operations.
//!
//! This module provides the error hierarchy shared by authentication adapters, with stable
//! error codes and a structured, serializable error response.

use serde::Serialize;
use thiserror::Error;

/// Main error type for adapter operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Adapter configuration is unusable (e.g. authenticator not executable)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Failed to launch, feed or reap a child process
    #[error("Failed to run {command}: {message}")]
    SpawnError {
        /// Program that was being run
        command: String,
        /// Error message
        message: String,
    },

    /// External command ran but reported failure
    #[error("External command failed: {command}: {message}")]
    ExternalCommand {
        /// Program that failed
        command: String,
        /// Error message
        message: String,
    },

    /// Account not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Output or record could not be parsed
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Operation timed out
    #[error("Timed out: {0}")]
    Timeout(String),

    /// I/O failure outside of process handling
    #[error("I/O error: {0}")]
    Io(String),
}

/// Specialized result type for adapter operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Structured error response for serialization.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ErrorResponse {
    /// Error details
    pub error: ErrorDetail,
}

/// Error detail structure.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ErrorDetail {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::SpawnError { .. } => "SPAWN_ERROR",
            Self::ExternalCommand { .. } => "EXTERNAL_COMMAND_FAILED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::ParseError(_) => "PARSE_ERROR",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::Timeout(_) => "TIMEOUT",
            Self::Io(_) => "IO_ERROR",
        }
    }

    /// Converts the error into an `ErrorResponse`.
    #[must_use]
    pub fn into_error_response(self) -> ErrorResponse {
        ErrorResponse {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.to_string(),
            },
        }
    }

    /// Returns true if this error should be reported to the operator.
    ///
    /// Lookup misses and bad requests are expected traffic; everything that points at a
    /// broken installation is not.
    #[must_use]
    pub const fn should_log(&self) -> bool {
        matches!(
            self,
            Self::ConfigError(_) | Self::SpawnError { .. } | Self::ExternalCommand { .. }
        )
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Self::InvalidRequest(format!("invalid filter pattern: {err}"))
    }
}
