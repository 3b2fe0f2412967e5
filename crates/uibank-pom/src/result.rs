//! Result and error types for the harness.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for harness operations
pub type PomResult<T> = Result<T, PomError>;

/// Errors that can occur while driving a page or running a scenario
#[derive(Debug, Error)]
pub enum PomError {
    /// Locator matched nothing within its bounded wait
    #[error("Element not found: {locator} (waited {timeout_ms}ms)")]
    ElementNotFound {
        /// Locator description
        locator: String,
        /// How long the locator waited
        timeout_ms: u64,
    },

    /// Locator matched more elements than its policy allows
    #[error("Element ambiguous: {locator} matched {count} elements")]
    ElementAmbiguous {
        /// Locator description
        locator: String,
        /// Number of matching elements
        count: usize,
    },

    /// The engine rejected an action
    #[error("Action '{action}' on {locator} failed: {message}")]
    ActionFailed {
        /// Locator description
        locator: String,
        /// Action name (click, fill, ...)
        action: String,
        /// Error message
        message: String,
    },

    /// Observed value differs from the expected one
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// Expected route or landmark never appeared
    #[error("Navigation to {expected} timed out after {timeout_ms}ms (last url: {last_url})")]
    NavigationTimeout {
        /// Expected route or screen
        expected: String,
        /// URL observed when the wait gave up
        last_url: String,
        /// Timeout in milliseconds
        timeout_ms: u64,
    },

    /// Generic bounded wait or scenario budget exceeded
    #[error("Operation timed out after {ms}ms")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
    },

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Low-level driver failure (evaluation, connection)
    #[error("Driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// Invalid configuration
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Navigation action not declared for the current screen
    #[error("No transition '{action}' from screen {from}")]
    InvalidTransition {
        /// Screen the scenario was on
        from: String,
        /// Requested action
        action: String,
    },

    /// No scenario registered under that name
    #[error("Unknown scenario: {name}")]
    UnknownScenario {
        /// Requested name
        name: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

/// Condition kind attached to a failed scenario step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// See [`PomError::ElementNotFound`]
    ElementNotFound,
    /// See [`PomError::ElementAmbiguous`]
    ElementAmbiguous,
    /// See [`PomError::ActionFailed`]
    ActionFailed,
    /// See [`PomError::AssertionFailed`]
    AssertionFailed,
    /// See [`PomError::NavigationTimeout`]
    NavigationTimeout,
    /// See [`PomError::Timeout`]
    Timeout,
    /// Browser, driver, config or I/O problems
    Infrastructure,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::ElementNotFound => "ElementNotFound",
            Self::ElementAmbiguous => "ElementAmbiguous",
            Self::ActionFailed => "ActionFailed",
            Self::AssertionFailed => "AssertionFailed",
            Self::NavigationTimeout => "NavigationTimeout",
            Self::Timeout => "Timeout",
            Self::Infrastructure => "Infrastructure",
        };
        f.write_str(name)
    }
}

impl PomError {
    /// Classify the error for scenario reports
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ElementNotFound { .. } => ErrorKind::ElementNotFound,
            Self::ElementAmbiguous { .. } => ErrorKind::ElementAmbiguous,
            Self::ActionFailed { .. } => ErrorKind::ActionFailed,
            Self::AssertionFailed { .. } => ErrorKind::AssertionFailed,
            Self::NavigationTimeout { .. } => ErrorKind::NavigationTimeout,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::BrowserLaunch { .. }
            | Self::Driver { .. }
            | Self::Config { .. }
            | Self::InvalidTransition { .. }
            | Self::UnknownScenario { .. }
            | Self::Io(_)
            | Self::Json(_)
            | Self::Yaml(_) => ErrorKind::Infrastructure,
        }
    }

    /// Create an assertion failure
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            message: message.into(),
        }
    }

    /// Create a driver error
    #[must_use]
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        let err = PomError::ElementNotFound {
            locator: "#username".into(),
            timeout_ms: 5000,
        };
        assert_eq!(err.kind(), ErrorKind::ElementNotFound);
        assert_eq!(PomError::assertion("x").kind(), ErrorKind::AssertionFailed);
        assert_eq!(PomError::Timeout { ms: 1 }.kind(), ErrorKind::Timeout);
        assert_eq!(PomError::config("bad").kind(), ErrorKind::Infrastructure);
    }

    #[test]
    fn test_display_includes_context() {
        let err = PomError::NavigationTimeout {
            expected: "/accounts".into(),
            last_url: "https://uibank.uipath.com/".into(),
            timeout_ms: 30_000,
        };
        let text = err.to_string();
        assert!(text.contains("/accounts"));
        assert!(text.contains("30000ms"));
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorKind::NavigationTimeout).unwrap();
        assert_eq!(json, "\"navigation_timeout\"");
        assert_eq!(ErrorKind::ElementAmbiguous.to_string(), "ElementAmbiguous");
    }
}
