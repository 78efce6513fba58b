//! Donation Ledger Writer
//!
//! Writes payment outcomes into the donation store.

use std::sync::Arc;

use donations_core::{DonationRecord, DonationStatus, DonationStore, NewDonation};

use crate::error::Result;

/// Result of recording a payment outcome
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LedgerWrite {
    /// A new record was written
    Created(DonationRecord),
    /// The charge was already recorded; nothing written
    Duplicate,
}

/// Ledger writer over a donation store
#[derive(Clone)]
pub struct LedgerWriter {
    store: Arc<dyn DonationStore>,
}

impl LedgerWriter {
    pub fn new(store: Arc<dyn DonationStore>) -> Self {
        Self { store }
    }

    /// Record a succeeded or failed payment, once per external charge id
    pub async fn record(&self, donation: NewDonation) -> Result<LedgerWrite> {
        let charge_id = donation.external_charge_id.clone();

        match self.store.insert_if_absent(donation).await? {
            Some(record) => {
                tracing::info!(
                    donation_id = %record.id,
                    charge_id = %record.external_charge_id,
                    status = %record.status,
                    amount = %record.amount,
                    currency = %record.currency,
                    "Recorded donation"
                );
                Ok(LedgerWrite::Created(record))
            }
            None => {
                tracing::info!(charge_id = %charge_id, "Charge already recorded, skipping");
                Ok(LedgerWrite::Duplicate)
            }
        }
    }

    /// Mark every record for a charge as refunded, returning how many changed
    pub async fn mark_refunded(&self, charge_id: &str) -> Result<u64> {
        let updated = self
            .store
            .update_status_by_charge(charge_id, DonationStatus::Refunded)
            .await?;

        if updated == 0 {
            tracing::warn!(charge_id = %charge_id, "Refund for unknown charge");
        } else {
            tracing::info!(charge_id = %charge_id, updated, "Marked donations refunded");
        }
        Ok(updated)
    }

    /// Underlying store
    pub fn store(&self) -> &Arc<dyn DonationStore> {
        &self.store
    }
}
