//! HTTP Handlers

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
};
use serde::Serialize;

use donations_core::DonationRequest;
use donations_payments::{PaymentError, signature::SIGNATURE_HEADER};

use crate::state::{AppState, Payments};

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub payments_configured: bool,
    pub store: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub session_id: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, code: &str, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.into(),
        }),
    )
}

fn payments(state: &AppState) -> Result<&Payments, ApiError> {
    state.payments.as_deref().ok_or_else(|| {
        api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "PAYMENTS_DISABLED",
            "Payments not configured",
        )
    })
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        payments_configured: state.payments.is_some(),
        store: state.store.name().to_string(),
    })
}

/// Create a hosted checkout session for a donation
pub async fn create_checkout(
    State(state): State<AppState>,
    payload: Result<Json<DonationRequest>, JsonRejection>,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let payments = payments(&state)?;

    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!("Rejected checkout body: {}", rejection.body_text());
        api_error(StatusCode::BAD_REQUEST, "INVALID_REQUEST", "Invalid request body")
    })?;

    let session = payments.checkout.initiate(request).await.map_err(|e| {
        if e.is_client_error() {
            tracing::debug!("Invalid checkout request: {}", e);
            api_error(StatusCode::BAD_REQUEST, "INVALID_REQUEST", e.user_message())
        } else {
            tracing::error!("Checkout error: {}", e);
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "CHECKOUT_ERROR",
                "Failed to create checkout session",
            )
        }
    })?;

    Ok(Json(CheckoutResponse {
        session_id: session.id,
        url: session.url,
    }))
}

/// Stripe webhook handler
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<WebhookAck>, ApiError> {
    let payments = payments(&state)?;

    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            api_error(
                StatusCode::BAD_REQUEST,
                "MISSING_SIGNATURE",
                "Missing Stripe signature",
            )
        })?;

    let event = payments
        .webhooks
        .parse_event(&body, signature)
        .map_err(|e| {
            tracing::warn!("Webhook signature failed: {}", e);
            api_error(StatusCode::BAD_REQUEST, "INVALID_SIGNATURE", "Invalid signature")
        })?;

    let outcome = payments.webhooks.handle(event).await.map_err(|e| match e {
        PaymentError::WebhookParse(_) => {
            tracing::warn!("Malformed webhook event: {}", e);
            api_error(StatusCode::BAD_REQUEST, "INVALID_EVENT", e.user_message())
        }
        _ => {
            tracing::error!(retryable = e.is_retryable(), "Webhook processing error: {}", e);
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "WEBHOOK_ERROR",
                "Webhook processing failed",
            )
        }
    })?;

    tracing::debug!(outcome = ?outcome, "Webhook handled");

    Ok(Json(WebhookAck { received: true }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use rust_decimal_macros::dec;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use donations_core::{
        DonationError, DonationRecord, DonationStatus, DonationStore, MemoryDonationStore,
        NewDonation,
    };
    use donations_payments::{MockGateway, signature};

    use crate::routes::app;
    use crate::state::{AppState, Payments};

    const SECRET: &str = "whsec_test";

    struct TestApp {
        router: Router,
        gateway: Arc<MockGateway>,
    }

    fn test_app_with(gateway: MockGateway, store: Arc<dyn DonationStore>) -> TestApp {
        let gateway = Arc::new(gateway);
        let payments = Payments::new(gateway.clone(), store.clone(), SECRET, "https://example.org");
        let state = AppState {
            payments: Some(Arc::new(payments)),
            store,
        };
        TestApp {
            router: app(state),
            gateway,
        }
    }

    fn test_app(store: Arc<MemoryDonationStore>) -> TestApp {
        test_app_with(MockGateway::new(), store)
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn checkout_request(body: &Value) -> Request<Body> {
        Request::post("/api/donations/checkout")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn webhook_request(payload: &str, signature: Option<String>) -> Request<Body> {
        let mut builder = Request::post("/api/webhooks/stripe");
        if let Some(signature) = signature {
            builder = builder.header("stripe-signature", signature);
        }
        builder.body(Body::from(payload.to_string())).unwrap()
    }

    fn signed(payload: &str) -> Option<String> {
        Some(signature::sign(payload, SECRET, chrono::Utc::now().timestamp()).unwrap())
    }

    fn charge_payload(event_type: &str, charge_id: &str, amount: i64) -> String {
        json!({
            "id": "evt_1",
            "type": event_type,
            "data": { "object": {
                "id": charge_id,
                "amount": amount,
                "currency": "zmw",
                "payment_intent": "pi_1",
            }}
        })
        .to_string()
    }

    /// Store that fails every call
    struct FailingStore;

    #[async_trait]
    impl DonationStore for FailingStore {
        async fn insert_if_absent(
            &self,
            _donation: NewDonation,
        ) -> donations_core::Result<Option<DonationRecord>> {
            Err(DonationError::Storage("database unavailable".into()))
        }

        async fn update_status_by_charge(
            &self,
            _charge_id: &str,
            _status: DonationStatus,
        ) -> donations_core::Result<u64> {
            Err(DonationError::Storage("database unavailable".into()))
        }

        async fn find_by_charge(&self, _charge_id: &str) -> donations_core::Result<Vec<DonationRecord>> {
            Err(DonationError::Storage("database unavailable".into()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app(Arc::new(MemoryDonationStore::new()));
        let request = Request::get("/health").body(Body::empty()).unwrap();
        let (status, body) = send(&app.router, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["payments_configured"], true);
        assert_eq!(body["store"], "memory");
    }

    #[tokio::test]
    async fn test_checkout_then_webhook_records_donation() {
        let store = Arc::new(MemoryDonationStore::new());
        let app = test_app(store.clone());

        let (status, body) = send(
            &app.router,
            checkout_request(&json!({
                "amount": 250,
                "donorName": "Jane Doe",
                "donorEmail": "jane@example.com",
                "isRecurring": false
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["sessionId"].as_str().unwrap().starts_with("cs_test_"));
        assert!(body["url"].as_str().unwrap().starts_with("https://"));

        let sessions = app.gateway.created_sessions().await;
        let session = &sessions[0];
        assert_eq!(session.unit_amount, 25000);
        assert_eq!(session.currency, "ZMW");
        assert_eq!(
            session.success_url,
            "https://example.org/donate/success?session_id={CHECKOUT_SESSION_ID}"
        );
        app.gateway
            .insert_session_metadata("pi_1", session.metadata.clone())
            .await;

        let payload = charge_payload("charge.succeeded", "ch_1", 25000);
        let (status, body) = send(&app.router, webhook_request(&payload, signed(&payload))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "received": true }));

        let records = store.all().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].amount, dec!(250));
        assert_eq!(records[0].currency, "ZMW");
        assert_eq!(records[0].status, DonationStatus::Completed);
        assert_eq!(records[0].donor_email, "jane@example.com");
    }

    #[tokio::test]
    async fn test_checkout_validation_errors() {
        let app = test_app(Arc::new(MemoryDonationStore::new()));

        for body in [
            json!({ "amount": 0, "donorName": "Jane", "donorEmail": "jane@example.com" }),
            json!({ "donorName": "Jane", "donorEmail": "jane@example.com" }),
            json!({ "amount": 10, "donorEmail": "jane@example.com" }),
            json!({ "amount": 10, "donorName": "Jane" }),
        ] {
            let (status, response) = send(&app.router, checkout_request(&body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
            assert_eq!(response["code"], "INVALID_REQUEST");
        }
        assert_eq!(app.gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_checkout_malformed_json() {
        let app = test_app(Arc::new(MemoryDonationStore::new()));
        let request = Request::post("/api/donations/checkout")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, _) = send(&app.router, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_checkout_gateway_failure() {
        let app = test_app_with(MockGateway::failing(), Arc::new(MemoryDonationStore::new()));
        let (status, body) = send(
            &app.router,
            checkout_request(&json!({
                "amount": 50,
                "donorName": "Jane Doe",
                "donorEmail": "jane@example.com"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "CHECKOUT_ERROR");
    }

    #[tokio::test]
    async fn test_payments_disabled() {
        let state = AppState {
            payments: None,
            store: Arc::new(MemoryDonationStore::new()),
        };
        let router = app(state);

        let (status, body) = send(&router, checkout_request(&json!({ "amount": 5 }))).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["code"], "PAYMENTS_DISABLED");

        let (status, _) = send(&router, webhook_request("{}", Some("t=1,v1=00".into()))).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_webhook_rejects_bad_signature() {
        let store = Arc::new(MemoryDonationStore::new());
        let app = test_app(store.clone());
        let payload = charge_payload("charge.succeeded", "ch_1", 25000);
        app.gateway
            .insert_session_metadata(
                "pi_1",
                [("donorName", "Jane Doe"), ("donorEmail", "jane@example.com")]
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            )
            .await;

        let forged = Some(signature::sign(&payload, "whsec_forged", chrono::Utc::now().timestamp()).unwrap());
        let (status, body) = send(&app.router, webhook_request(&payload, forged)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_SIGNATURE");

        let (status, body) = send(&app.router, webhook_request(&payload, None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "MISSING_SIGNATURE");

        assert!(store.is_empty().await);
        assert_eq!(app.gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_webhook_without_metadata_still_acknowledged() {
        let store = Arc::new(MemoryDonationStore::new());
        let app = test_app(store.clone());

        let payload = charge_payload("charge.succeeded", "ch_1", 25000);
        let (status, body) = send(&app.router, webhook_request(&payload, signed(&payload))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["received"], true);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_webhook_redelivery_records_once() {
        let store = Arc::new(MemoryDonationStore::new());
        let app = test_app(store.clone());
        app.gateway
            .insert_session_metadata(
                "pi_1",
                [("donorName", "Jane Doe"), ("donorEmail", "jane@example.com")]
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            )
            .await;

        let payload = charge_payload("charge.succeeded", "ch_1", 25000);
        for _ in 0..2 {
            let (status, _) = send(&app.router, webhook_request(&payload, signed(&payload))).await;
            assert_eq!(status, StatusCode::OK);
        }
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_webhook_store_failure_is_server_error() {
        let app = test_app_with(MockGateway::new(), Arc::new(FailingStore));
        let payload = charge_payload("charge.refunded", "ch_1", 25000);
        let (status, body) = send(&app.router, webhook_request(&payload, signed(&payload))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "WEBHOOK_ERROR");
    }

    #[tokio::test]
    async fn test_webhook_ignores_other_events() {
        let store = Arc::new(MemoryDonationStore::new());
        let app = test_app(store.clone());
        let payload = json!({
            "id": "evt_2",
            "type": "checkout.session.completed",
            "data": { "object": { "id": "cs_test_1" } }
        })
        .to_string();
        let (status, _) = send(&app.router, webhook_request(&payload, signed(&payload))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(store.is_empty().await);
    }
}
