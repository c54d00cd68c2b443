//! Error types for the receipts feature.

use thiserror::Error;

/// Failure reported by the receipt repository.
///
/// Every cause (transport, encoding, decoding, HTTP status) collapses into a
/// description for display; callers never branch on the cause.
#[derive(Error, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReceiptError {
    /// Human-readable failure description
    #[error("[ReceiptError] {0}")]
    Message(String),
}

impl ReceiptError {
    /// Creates a [`ReceiptError::Message`].
    #[must_use]
    pub fn message(description: impl Into<String>) -> Self {
        Self::Message(description.into())
    }

    /// The bare description, without the `[ReceiptError]` prefix.
    #[must_use]
    pub fn description(&self) -> &str {
        match self {
            Self::Message(description) => description,
        }
    }
}

impl From<reqwest::Error> for ReceiptError {
    fn from(error: reqwest::Error) -> Self {
        Self::Message(error.to_string())
    }
}

/// Errors raised while building client configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A URL setting could not be parsed or cannot carry a path
    #[error("Invalid URL for {setting}: {reason}")]
    InvalidUrl {
        /// Name of the offending setting
        setting: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}
