//! CLI error types

use std::process::ExitCode;
use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// CLI error types
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Invalid argument
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Error message
        message: String,
    },

    /// Some scenarios did not pass
    #[error("{failed} of {total} scenarios did not pass")]
    ScenariosFailed {
        /// Scenarios that failed, timed out or were skipped
        failed: usize,
        /// Scenarios selected
        total: usize,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Harness error
    #[error("{0}")]
    Pom(#[from] uibank_pom::PomError),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid argument error
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Process exit code: 1 for scenario failures, 2 for everything else
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::ScenariosFailed { .. } => ExitCode::from(1),
            _ => ExitCode::from(2),
        }
    }
}
