//! Error Types

use thiserror::Error;

/// Result type alias for donation operations
pub type Result<T> = std::result::Result<T, DonationError>;

/// Donation domain errors
#[derive(Error, Debug)]
pub enum DonationError {
    /// A required request field is absent or blank
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// Amount absent, below the minimum, or not representable in minor units
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Status string that does not name a known status
    #[error("Unknown donation status: {0}")]
    UnknownStatus(String),

    /// Donation store failure
    #[error("Storage error: {0}")]
    Storage(String),
}

impl DonationError {
    /// Client input errors map to 400 and are never retried
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingField(_) | Self::InvalidAmount(_) | Self::UnknownStatus(_)
        )
    }

    /// Check if this error is retryable
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage(_))
    }

    /// Get user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingField(field) => format!("{field} is required"),
            Self::InvalidAmount(_) => "Amount must be at least 1".into(),
            Self::UnknownStatus(status) => format!("Unknown status '{status}'"),
            Self::Storage(_) => "An error occurred processing your request.".into(),
        }
    }
}
