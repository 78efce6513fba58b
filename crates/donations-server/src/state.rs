//! Application State

use std::sync::Arc;

use donations_core::DonationStore;
use donations_payments::{
    CheckoutInitiator, LedgerWriter, PaymentGateway, RedirectUrls, WebhookReceiver,
};

/// Checkout and webhook services sharing one gateway
pub struct Payments {
    pub checkout: CheckoutInitiator,
    pub webhooks: WebhookReceiver,
}

impl Payments {
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        store: Arc<dyn DonationStore>,
        webhook_secret: &str,
        app_base_url: &str,
    ) -> Self {
        Self {
            checkout: CheckoutInitiator::new(
                gateway.clone(),
                RedirectUrls::from_base_url(app_base_url),
            ),
            webhooks: WebhookReceiver::new(gateway, LedgerWriter::new(store), webhook_secret),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Payment services (optional - None if Stripe is not configured)
    pub payments: Option<Arc<Payments>>,

    /// Donation ledger
    pub store: Arc<dyn DonationStore>,
}
