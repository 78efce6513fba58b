//! Payment Error Types

use donations_core::DonationError;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, PaymentError>;

/// Payment-related errors
#[derive(Error, Debug)]
pub enum PaymentError {
    /// Stripe API error
    #[error("Stripe error: {0}")]
    Stripe(String),

    /// Webhook signature verification failed
    #[error("Webhook signature invalid: {0}")]
    WebhookSignature(String),

    /// Webhook payload parsing failed
    #[error("Webhook parse error: {0}")]
    WebhookParse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation or storage error from the donation domain
    #[error(transparent)]
    Donation(#[from] DonationError),
}

impl PaymentError {
    /// Errors caused by the caller's input; answered with 400
    pub const fn is_client_error(&self) -> bool {
        match self {
            Self::WebhookSignature(_) | Self::WebhookParse(_) => true,
            Self::Donation(err) => err.is_client_error(),
            Self::Stripe(_) | Self::Config(_) => false,
        }
    }

    /// Check if this error is retryable
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Stripe(_) => true,
            Self::Donation(err) => err.is_retryable(),
            _ => false,
        }
    }

    /// Get user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            Self::Stripe(_) => "Payment processing failed. Please try again.".into(),
            Self::WebhookSignature(_) => "Invalid signature".into(),
            Self::WebhookParse(_) => "Malformed webhook payload".into(),
            Self::Config(_) => "Service configuration error.".into(),
            Self::Donation(err) => err.user_message(),
        }
    }
}
