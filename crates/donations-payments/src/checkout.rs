//! Checkout Session Initiator
//!
//! Validates a donation request, finds or creates the processor customer and
//! opens a hosted checkout session carrying the donor metadata.

use std::sync::Arc;

use donations_core::{CURRENCY, DonationRequest, DonorMetadata, ValidatedDonation};

use crate::error::Result;
use crate::gateway::{HostedSession, PaymentGateway, SessionMode, SessionRequest};

/// Redirect targets for the hosted page
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedirectUrls {
    pub success_url: String,
    pub cancel_url: String,
}

impl RedirectUrls {
    /// Derive redirect targets from the site's base URL
    pub fn from_base_url(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            success_url: format!("{base}/donate/success?session_id={{CHECKOUT_SESSION_ID}}"),
            cancel_url: format!("{base}/donate/cancel"),
        }
    }
}

/// Opens hosted checkout sessions for donations
#[derive(Clone)]
pub struct CheckoutInitiator {
    gateway: Arc<dyn PaymentGateway>,
    redirects: RedirectUrls,
}

impl CheckoutInitiator {
    pub fn new(gateway: Arc<dyn PaymentGateway>, redirects: RedirectUrls) -> Self {
        Self { gateway, redirects }
    }

    /// Validate the request and create a hosted checkout session.
    ///
    /// Validation failures return before any gateway call.
    pub async fn initiate(&self, request: DonationRequest) -> Result<HostedSession> {
        let donation = request.validate()?;

        let customer_id = self
            .gateway
            .find_or_create_customer(&donation.donor_email, &donation.donor_name)
            .await?;

        let session = self
            .gateway
            .create_checkout_session(self.session_request(&donation, customer_id))
            .await?;

        tracing::info!(
            session_id = %session.id,
            amount = %donation.amount,
            recurring = donation.is_recurring,
            "Created donation checkout session"
        );

        Ok(session)
    }

    fn session_request(&self, donation: &ValidatedDonation, customer_id: String) -> SessionRequest {
        let mode = SessionMode::for_recurring(donation.is_recurring);
        let product_name = match mode {
            SessionMode::Payment => "Donation",
            SessionMode::Subscription => "Monthly Donation",
        };

        SessionRequest {
            customer_id,
            mode,
            currency: CURRENCY.to_string(),
            unit_amount: donation.amount_minor,
            product_name: product_name.to_string(),
            metadata: DonorMetadata::from(donation).to_map(),
            success_url: self.redirects.success_url.clone(),
            cancel_url: self.redirects.cancel_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PaymentError;
    use crate::gateway::MockGateway;
    use rust_decimal_macros::dec;

    fn initiator(gateway: Arc<MockGateway>) -> CheckoutInitiator {
        CheckoutInitiator::new(gateway, RedirectUrls::from_base_url("https://example.org/"))
    }

    fn jane() -> DonationRequest {
        DonationRequest {
            amount: Some(dec!(250)),
            donor_name: Some("Jane Doe".into()),
            donor_email: Some("jane@example.com".into()),
            is_recurring: Some(false),
            ..Default::default()
        }
    }

    #[test]
    fn test_redirect_urls() {
        let urls = RedirectUrls::from_base_url("https://example.org/");
        assert_eq!(
            urls.success_url,
            "https://example.org/donate/success?session_id={CHECKOUT_SESSION_ID}"
        );
        assert_eq!(urls.cancel_url, "https://example.org/donate/cancel");
    }

    #[tokio::test]
    async fn test_single_payment_session() {
        let gateway = Arc::new(MockGateway::new());
        let session = initiator(gateway.clone()).initiate(jane()).await.unwrap();
        assert!(session.url.contains(&session.id));

        let sessions = gateway.created_sessions().await;
        assert_eq!(sessions.len(), 1);
        let created = &sessions[0];
        assert_eq!(created.mode, SessionMode::Payment);
        assert_eq!(created.currency, "ZMW");
        assert_eq!(created.unit_amount, 25000);
        assert_eq!(created.metadata.len(), 3);
        assert_eq!(created.metadata["donorName"], "Jane Doe");
        assert_eq!(created.metadata["donorEmail"], "jane@example.com");
        assert_eq!(created.metadata["isRecurring"], "false");
    }

    #[tokio::test]
    async fn test_recurring_session_echoes_optional_fields() {
        let gateway = Arc::new(MockGateway::new());
        let mut request = jane();
        request.is_recurring = Some(true);
        request.message = Some("Keep planting".into());
        request.project_id = Some("proj_42".into());

        initiator(gateway.clone()).initiate(request).await.unwrap();

        let sessions = gateway.created_sessions().await;
        let created = &sessions[0];
        assert_eq!(created.mode, SessionMode::Subscription);
        assert_eq!(created.metadata["message"], "Keep planting");
        assert_eq!(created.metadata["projectId"], "proj_42");
        assert_eq!(created.metadata["isRecurring"], "true");
    }

    #[tokio::test]
    async fn test_metadata_echoes_fields_verbatim() {
        let gateway = Arc::new(MockGateway::new());
        let mut request = jane();
        request.donor_name = Some("  Jane Doe ".into());
        request.donor_email = Some("jane@example.com ".into());
        request.message = Some("Thanks!\nFrom the whole family\n".into());

        initiator(gateway.clone()).initiate(request).await.unwrap();

        let sessions = gateway.created_sessions().await;
        let created = &sessions[0];
        assert_eq!(created.metadata["donorName"], "  Jane Doe ");
        assert_eq!(created.metadata["donorEmail"], "jane@example.com ");
        assert_eq!(created.metadata["message"], "Thanks!\nFrom the whole family\n");
    }

    #[tokio::test]
    async fn test_customer_reused_across_donations() {
        let gateway = Arc::new(MockGateway::new());
        let initiator = initiator(gateway.clone());
        initiator.initiate(jane()).await.unwrap();
        initiator.initiate(jane()).await.unwrap();

        assert_eq!(gateway.customer_count().await, 1);
        let sessions = gateway.created_sessions().await;
        assert_eq!(sessions[0].customer_id, sessions[1].customer_id);
    }

    #[tokio::test]
    async fn test_invalid_requests_never_reach_gateway() {
        let gateway = Arc::new(MockGateway::new());
        let initiator = initiator(gateway.clone());

        let mut low = jane();
        low.amount = Some(dec!(0.5));
        let mut nameless = jane();
        nameless.donor_name = None;
        let mut emailless = jane();
        emailless.donor_email = Some(String::new());

        for request in [low, nameless, emailless] {
            let err = initiator.initiate(request).await.unwrap_err();
            assert!(err.is_client_error());
        }
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_gateway_failure_is_server_error() {
        let gateway = Arc::new(MockGateway::failing());
        let err = initiator(gateway).initiate(jane()).await.unwrap_err();
        assert!(matches!(err, PaymentError::Stripe(_)));
        assert!(!err.is_client_error());
    }
}
