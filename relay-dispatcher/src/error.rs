//! Error types for the relay

use interfaces::ShareOutcome;
use thiserror::Error;

/// A payload field that failed validation. The messages are shown to the
/// person who pressed "share", so they name the field and the fix.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required.")]
    Missing { field: &'static str },

    #[error("{field} must be at most {max} characters.")]
    TooLong { field: &'static str, max: usize },

    #[error("URL must be a valid absolute link.")]
    InvalidUrl,
}

/// Errors that can end a relay attempt
#[derive(Debug, Error)]
pub enum RelayError {
    /// The payload was rejected before anything was sent
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// A required deployment setting is absent
    #[error("Missing environment variable {name}. Add it to your deployment configuration.")]
    MissingConfig { name: &'static str },

    /// The messaging endpoint refused the message or could not be reached
    #[error("{0}")]
    Delivery(String),

    /// The HTTP client could not be built, so nothing was attempted
    #[error("Failed to set up the Telegram client: {0}")]
    Setup(String),
}

impl RelayError {
    /// Only delivery failures are worth resubmitting unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Delivery(_))
    }
}

impl From<RelayError> for ShareOutcome {
    fn from(error: RelayError) -> Self {
        ShareOutcome::error(error.to_string())
    }
}
