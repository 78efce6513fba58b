//! Stripe Gateway
//!
//! `PaymentGateway` backed by the Stripe API via `async-stripe`.

use std::collections::HashMap;

use async_trait::async_trait;
use stripe::{
    CheckoutSession, CheckoutSessionMode, Client, CreateCheckoutSession,
    CreateCheckoutSessionLineItems, CreateCheckoutSessionLineItemsPriceData,
    CreateCheckoutSessionLineItemsPriceDataProductData,
    CreateCheckoutSessionLineItemsPriceDataRecurring,
    CreateCheckoutSessionLineItemsPriceDataRecurringInterval, CreateCustomer, Currency, Customer,
    CustomerId, ListCheckoutSessions, ListCustomers, PaymentIntentId,
};

use super::{HostedSession, PaymentGateway, SessionMode, SessionRequest};
use crate::error::{PaymentError, Result};

/// Stripe client wrapper
pub struct StripeGateway {
    client: Client,
}

impl StripeGateway {
    /// Create a new Stripe gateway
    pub fn new(secret_key: &str) -> Self {
        Self {
            client: Client::new(secret_key),
        }
    }
}

fn currency(code: &str) -> Result<Currency> {
    match code.to_ascii_uppercase().as_str() {
        "ZMW" => Ok(Currency::ZMW),
        "USD" => Ok(Currency::USD),
        other => Err(PaymentError::Config(format!("Unsupported currency: {other}"))),
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn find_customer_by_email(&self, email: &str) -> Result<Option<String>> {
        let mut params = ListCustomers::new();
        params.email = Some(email);
        params.limit = Some(1);

        let customers = Customer::list(&self.client, &params)
            .await
            .map_err(|e| PaymentError::Stripe(e.to_string()))?;

        Ok(customers.data.into_iter().next().map(|c| c.id.to_string()))
    }

    async fn create_customer(&self, email: &str, name: &str) -> Result<String> {
        let mut params = CreateCustomer::new();
        params.email = Some(email);
        params.name = Some(name);

        let customer = Customer::create(&self.client, params)
            .await
            .map_err(|e| PaymentError::Stripe(e.to_string()))?;

        tracing::debug!(customer_id = %customer.id, "Created Stripe customer");
        Ok(customer.id.to_string())
    }

    async fn create_checkout_session(&self, request: SessionRequest) -> Result<HostedSession> {
        let customer_id: CustomerId = request
            .customer_id
            .parse()
            .map_err(|e| PaymentError::Stripe(format!("Invalid customer id: {e}")))?;

        let mut params = CreateCheckoutSession::new();
        params.customer = Some(customer_id);
        params.success_url = Some(&request.success_url);
        params.cancel_url = Some(&request.cancel_url);
        params.metadata = Some(request.metadata.clone());
        params.mode = Some(match request.mode {
            SessionMode::Payment => CheckoutSessionMode::Payment,
            SessionMode::Subscription => CheckoutSessionMode::Subscription,
        });

        let recurring = match request.mode {
            SessionMode::Payment => None,
            SessionMode::Subscription => Some(CreateCheckoutSessionLineItemsPriceDataRecurring {
                interval: CreateCheckoutSessionLineItemsPriceDataRecurringInterval::Month,
                interval_count: Some(1),
            }),
        };

        params.line_items = Some(vec![CreateCheckoutSessionLineItems {
            quantity: Some(1),
            price_data: Some(CreateCheckoutSessionLineItemsPriceData {
                currency: currency(&request.currency)?,
                unit_amount: Some(request.unit_amount),
                product_data: Some(CreateCheckoutSessionLineItemsPriceDataProductData {
                    name: request.product_name.clone(),
                    ..Default::default()
                }),
                recurring,
                ..Default::default()
            }),
            ..Default::default()
        }]);

        let session = CheckoutSession::create(&self.client, params)
            .await
            .map_err(|e| PaymentError::Stripe(e.to_string()))?;

        let url = session
            .url
            .ok_or_else(|| PaymentError::Stripe("No checkout URL returned".into()))?;

        Ok(HostedSession {
            id: session.id.to_string(),
            url,
        })
    }

    async fn session_metadata_for_payment_intent(
        &self,
        payment_intent_id: &str,
    ) -> Result<Option<HashMap<String, String>>> {
        let payment_intent: PaymentIntentId = payment_intent_id
            .parse()
            .map_err(|e| PaymentError::WebhookParse(format!("Invalid payment intent id: {e}")))?;

        let mut params = ListCheckoutSessions::new();
        params.payment_intent = Some(payment_intent);
        params.limit = Some(1);

        let sessions = CheckoutSession::list(&self.client, &params)
            .await
            .map_err(|e| PaymentError::Stripe(e.to_string()))?;

        Ok(sessions.data.into_iter().next().and_then(|s| s.metadata))
    }

    fn name(&self) -> &str {
        "stripe"
    }
}
