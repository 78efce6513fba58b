//! Payment Gateway
//!
//! The processor operations the donation flow depends on, behind a trait so
//! the flow can run against Stripe or an in-process mock.

mod mock;
mod stripe_client;

pub use mock::MockGateway;
pub use stripe_client::StripeGateway;

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Hosted checkout mode
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    /// One-off payment
    Payment,
    /// Monthly recurring subscription
    Subscription,
}

impl SessionMode {
    pub const fn for_recurring(is_recurring: bool) -> Self {
        if is_recurring {
            Self::Subscription
        } else {
            Self::Payment
        }
    }
}

/// Parameters for a hosted checkout session with a single line item
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionRequest {
    /// Processor customer id
    pub customer_id: String,
    pub mode: SessionMode,
    /// Upper-case ISO currency code
    pub currency: String,
    /// Line item price in minor units
    pub unit_amount: i64,
    pub product_name: String,
    pub metadata: HashMap<String, String>,
    pub success_url: String,
    pub cancel_url: String,
}

/// A created hosted checkout session
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostedSession {
    /// Processor session id
    pub id: String,
    /// URL to redirect the donor to
    pub url: String,
}

/// Payment processor operations (Strategy pattern)
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Look up a customer by email, returning its id
    async fn find_customer_by_email(&self, email: &str) -> Result<Option<String>>;

    /// Create a customer, returning its id
    async fn create_customer(&self, email: &str, name: &str) -> Result<String>;

    /// Find a customer by email, creating one if absent
    async fn find_or_create_customer(&self, email: &str, name: &str) -> Result<String> {
        match self.find_customer_by_email(email).await? {
            Some(id) => Ok(id),
            None => self.create_customer(email, name).await,
        }
    }

    /// Create a hosted checkout session
    async fn create_checkout_session(&self, request: SessionRequest) -> Result<HostedSession>;

    /// Metadata of the checkout session that produced a payment intent, if
    /// such a session exists
    async fn session_metadata_for_payment_intent(
        &self,
        payment_intent_id: &str,
    ) -> Result<Option<HashMap<String, String>>>;

    /// Gateway name
    fn name(&self) -> &str;
}
