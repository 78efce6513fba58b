//! Stripe Webhook Handling
//!
//! Verifies deliveries, parses the charge events the ledger cares about and
//! dispatches each to a typed handler returning a structured outcome.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use donations_core::{DonationStatus, DonorMetadata, NewDonation};

use crate::error::{PaymentError, Result};
use crate::gateway::PaymentGateway;
use crate::ledger::{LedgerWrite, LedgerWriter};
use crate::signature::{self, DEFAULT_TOLERANCE_SECS};

/// Verified webhook event envelope
#[derive(Clone, Debug, Deserialize)]
pub struct WebhookEvent {
    pub id: String,

    #[serde(rename = "type")]
    pub event_type: String,

    pub data: EventData,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EventData {
    pub object: serde_json::Value,
}

/// The charge fields the ledger reads
#[derive(Clone, Debug, Deserialize)]
pub struct Charge {
    pub id: String,

    /// Amount in minor units
    pub amount: i64,

    /// Lower-case ISO currency code
    pub currency: String,

    #[serde(default)]
    pub payment_intent: Option<String>,

    /// Set when the charge pays a subscription invoice
    #[serde(default)]
    pub invoice: Option<String>,
}

/// Event types with a handler
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    ChargeSucceeded,
    ChargeFailed,
    ChargeRefunded,
}

impl EventKind {
    pub fn from_type(event_type: &str) -> Option<Self> {
        match event_type {
            "charge.succeeded" => Some(Self::ChargeSucceeded),
            "charge.failed" => Some(Self::ChargeFailed),
            "charge.refunded" => Some(Self::ChargeRefunded),
            _ => None,
        }
    }
}

/// Why a charge event produced no record
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The charge carries no payment intent reference
    NoPaymentIntent,
    /// No checkout session produced the payment intent
    SessionNotFound,
    /// Subscription charge; its payment intent belongs to an invoice, not a
    /// checkout session
    SubscriptionInvoice,
    /// The session metadata lacks donor name or email
    IncompleteMetadata,
}

/// Outcome of handling one webhook event
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum WebhookOutcome {
    Recorded {
        donation_id: Uuid,
        charge_id: String,
        status: DonationStatus,
    },
    Duplicate {
        charge_id: String,
    },
    Skipped {
        charge_id: String,
        reason: SkipReason,
    },
    Refunded {
        charge_id: String,
        updated: u64,
    },
    Ignored {
        event_type: String,
    },
}

/// Webhook receiver
pub struct WebhookReceiver {
    gateway: Arc<dyn PaymentGateway>,
    ledger: LedgerWriter,
    secret: String,
    tolerance_secs: i64,
}

impl WebhookReceiver {
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        ledger: LedgerWriter,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            ledger,
            secret: secret.into(),
            tolerance_secs: DEFAULT_TOLERANCE_SECS,
        }
    }

    /// Override the accepted signature age
    #[must_use]
    pub fn with_tolerance(mut self, tolerance_secs: i64) -> Self {
        self.tolerance_secs = tolerance_secs;
        self
    }

    /// Verify webhook signature and parse event
    pub fn parse_event(&self, payload: &str, signature: &str) -> Result<WebhookEvent> {
        signature::verify(
            payload,
            signature,
            &self.secret,
            chrono::Utc::now().timestamp(),
            self.tolerance_secs,
        )?;

        serde_json::from_str(payload).map_err(|e| PaymentError::WebhookParse(e.to_string()))
    }

    /// Process a verified webhook event
    pub async fn handle(&self, event: WebhookEvent) -> Result<WebhookOutcome> {
        tracing::info!(event_id = %event.id, event_type = %event.event_type, "Processing Stripe webhook");

        let Some(kind) = EventKind::from_type(&event.event_type) else {
            tracing::debug!(event_type = %event.event_type, "Unhandled webhook event");
            return Ok(WebhookOutcome::Ignored {
                event_type: event.event_type,
            });
        };

        let charge: Charge = serde_json::from_value(event.data.object)
            .map_err(|e| PaymentError::WebhookParse(format!("Invalid charge data: {e}")))?;

        match kind {
            EventKind::ChargeSucceeded => self.record_outcome(charge, DonationStatus::Completed).await,
            EventKind::ChargeFailed => self.record_outcome(charge, DonationStatus::Failed).await,
            EventKind::ChargeRefunded => self.record_refund(charge).await,
        }
    }

    /// Recover donor metadata from the originating session and write a record
    async fn record_outcome(&self, charge: Charge, status: DonationStatus) -> Result<WebhookOutcome> {
        let Some(payment_intent) = charge.payment_intent.as_deref() else {
            return Ok(skipped(charge.id, SkipReason::NoPaymentIntent));
        };

        let Some(metadata) = self
            .gateway
            .session_metadata_for_payment_intent(payment_intent)
            .await?
        else {
            let reason = if charge.invoice.is_some() {
                SkipReason::SubscriptionInvoice
            } else {
                SkipReason::SessionNotFound
            };
            return Ok(skipped(charge.id, reason));
        };

        let Some(donor) = DonorMetadata::from_map(&metadata) else {
            return Ok(skipped(charge.id, SkipReason::IncompleteMetadata));
        };

        let donation = NewDonation::from_charge(&charge.id, charge.amount, &charge.currency, donor, status);

        Ok(match self.ledger.record(donation).await? {
            LedgerWrite::Created(record) => WebhookOutcome::Recorded {
                donation_id: record.id,
                charge_id: record.external_charge_id,
                status: record.status,
            },
            LedgerWrite::Duplicate => WebhookOutcome::Duplicate { charge_id: charge.id },
        })
    }

    async fn record_refund(&self, charge: Charge) -> Result<WebhookOutcome> {
        let updated = self.ledger.mark_refunded(&charge.id).await?;
        Ok(WebhookOutcome::Refunded {
            charge_id: charge.id,
            updated,
        })
    }
}

fn skipped(charge_id: String, reason: SkipReason) -> WebhookOutcome {
    tracing::warn!(charge_id = %charge_id, reason = ?reason, "No donation recorded for charge");
    WebhookOutcome::Skipped { charge_id, reason }
}
