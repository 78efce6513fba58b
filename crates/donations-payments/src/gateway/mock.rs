//! Mock Gateway
//!
//! For testing and local development. Keeps customers and sessions in
//! memory and records every session it was asked to create.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{HostedSession, PaymentGateway, SessionRequest};
use crate::error::{PaymentError, Result};

/// In-memory payment gateway
#[derive(Default)]
pub struct MockGateway {
    customers: Mutex<HashMap<String, String>>,
    sessions: Mutex<Vec<SessionRequest>>,
    metadata_by_payment_intent: Mutex<HashMap<String, HashMap<String, String>>>,
    calls: AtomicUsize,
    failing: AtomicBool,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// A gateway whose every call fails with a Stripe error
    pub fn failing() -> Self {
        let gateway = Self::default();
        gateway.failing.store(true, Ordering::SeqCst);
        gateway
    }

    /// Register session metadata reachable through a payment intent id
    pub async fn insert_session_metadata(
        &self,
        payment_intent_id: impl Into<String>,
        metadata: HashMap<String, String>,
    ) {
        self.metadata_by_payment_intent
            .lock()
            .await
            .insert(payment_intent_id.into(), metadata);
    }

    /// Sessions created so far, oldest first
    pub async fn created_sessions(&self) -> Vec<SessionRequest> {
        self.sessions.lock().await.clone()
    }

    pub async fn customer_count(&self) -> usize {
        self.customers.lock().await.len()
    }

    /// Number of gateway calls made, failed ones included
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn begin_call(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(PaymentError::Stripe("mock gateway failure".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn find_customer_by_email(&self, email: &str) -> Result<Option<String>> {
        self.begin_call()?;
        Ok(self.customers.lock().await.get(email).cloned())
    }

    async fn create_customer(&self, email: &str, _name: &str) -> Result<String> {
        self.begin_call()?;
        let mut customers = self.customers.lock().await;
        let id = format!("cus_mock{}", customers.len() + 1);
        customers.insert(email.to_string(), id.clone());
        Ok(id)
    }

    async fn create_checkout_session(&self, request: SessionRequest) -> Result<HostedSession> {
        self.begin_call()?;
        let mut sessions = self.sessions.lock().await;
        let id = format!("cs_test_mock{}", sessions.len() + 1);
        sessions.push(request);
        Ok(HostedSession {
            url: format!("https://checkout.stripe.com/c/pay/{id}"),
            id,
        })
    }

    async fn session_metadata_for_payment_intent(
        &self,
        payment_intent_id: &str,
    ) -> Result<Option<HashMap<String, String>>> {
        self.begin_call()?;
        Ok(self
            .metadata_by_payment_intent
            .lock()
            .await
            .get(payment_intent_id)
            .cloned())
    }

    fn name(&self) -> &str {
        "mock"
    }
}
