//! Result and error types for storecheck.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for storecheck operations
pub type StorecheckResult<T> = Result<T, StorecheckError>;

/// Errors that can occur while driving a scenario
#[derive(Debug, Error)]
pub enum StorecheckError {
    /// Browser executable not found
    #[error("Browser not found. Install Chromium or set CHROMIUM_PATH")]
    BrowserNotFound,

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunchError {
        /// Error message
        message: String,
    },

    /// Page or protocol error
    #[error("Page error: {message}")]
    PageError {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    NavigationError {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// A bounded wait expired
    #[error("Timed out after {ms}ms waiting for {condition}")]
    Timeout {
        /// What was being waited for
        condition: String,
        /// Timeout in milliseconds
        ms: u64,
    },

    /// An expectation did not hold
    #[error("Assertion failed for {locator}: expected {expected}, got {actual}")]
    AssertionFailed {
        /// Locator description
        locator: String,
        /// Expected value
        expected: String,
        /// Last observed value
        actual: String,
    },

    /// A cart quantity field did not hold an integer
    #[error("Quantity is not a number for product: {product}. Got: {raw:?}")]
    QuantityParse {
        /// Product whose row was read
        product: String,
        /// Raw input value
        raw: String,
    },

    /// Element vanished between resolution and use
    #[error("Element not found: {locator}")]
    ElementNotFound {
        /// Locator description
        locator: String,
    },

    /// Strict locator matched more than one element
    #[error("Strict mode violation: {locator} resolved to {count} elements")]
    StrictModeViolation {
        /// Locator description
        locator: String,
        /// Number of matches
        count: usize,
    },

    /// Invalid state error (operation called in wrong state)
    #[error("Invalid state: {message}")]
    InvalidState {
        /// Error message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
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

impl StorecheckError {
    /// Create a page error
    #[must_use]
    pub fn page(message: impl Into<String>) -> Self {
        Self::PageError {
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

    /// Create a timeout error
    #[must_use]
    pub fn timeout(condition: impl Into<String>, ms: u64) -> Self {
        Self::Timeout {
            condition: condition.into(),
            ms,
        }
    }

    /// Create an assertion error
    #[must_use]
    pub fn assertion(
        locator: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::AssertionFailed {
            locator: locator.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Classify the error for reporting
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::AssertionFailed { .. } => FailureKind::Assertion,
            Self::Timeout { .. } => FailureKind::Timeout,
            Self::QuantityParse { .. } => FailureKind::Parse,
            Self::Config { .. } | Self::Yaml(_) => FailureKind::Config,
            _ => FailureKind::Driver,
        }
    }
}

/// Failure taxonomy used in reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    /// Expected value mismatch
    Assertion,
    /// Bounded wait exceeded
    Timeout,
    /// Quantity field not numeric
    Parse,
    /// Browser or protocol failure
    Driver,
    /// Invalid configuration
    Config,
}

impl FailureKind {
    /// Lowercase label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Assertion => "assertion",
            Self::Timeout => "timeout",
            Self::Parse => "parse",
            Self::Driver => "driver",
            Self::Config => "config",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_parse_message_names_product_and_raw() {
        let err = StorecheckError::QuantityParse {
            product: "Stuffed Frog".to_string(),
            raw: "two".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Quantity is not a number for product: Stuffed Frog. Got: \"two\""
        );
        assert_eq!(err.kind(), FailureKind::Parse);
    }

    #[test]
    fn test_timeout_message_names_condition() {
        let err = StorecheckError::timeout("css=.alert-success to be visible", 50_000);
        assert!(err.to_string().contains("50000ms"));
        assert!(err.to_string().contains(".alert-success"));
        assert_eq!(err.kind(), FailureKind::Timeout);
    }

    #[test]
    fn test_assertion_message_has_expected_and_actual() {
        let err = StorecheckError::assertion("css=#email-err", "\"Email is required\"", "\"\"");
        let text = err.to_string();
        assert!(text.contains("#email-err"));
        assert!(text.contains("Email is required"));
        assert_eq!(err.kind(), FailureKind::Assertion);
    }

    #[test]
    fn test_driver_errors_classify_as_driver() {
        assert_eq!(StorecheckError::BrowserNotFound.kind(), FailureKind::Driver);
        assert_eq!(
            StorecheckError::StrictModeViolation {
                locator: "li".into(),
                count: 2
            }
            .kind(),
            FailureKind::Driver
        );
        assert_eq!(FailureKind::Parse.to_string(), "parse");
    }
}
