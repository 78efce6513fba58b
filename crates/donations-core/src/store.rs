//! Donation Store
//!
//! Storage abstraction for the donation ledger plus an in-memory
//! implementation for development and tests.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::donation::{DonationRecord, NewDonation};
use crate::error::Result;
use crate::status::DonationStatus;

/// Donation ledger storage
#[async_trait]
pub trait DonationStore: Send + Sync {
    /// Insert a record unless one already exists for the same external
    /// charge id. Returns `None` when the charge was already recorded.
    async fn insert_if_absent(&self, donation: NewDonation) -> Result<Option<DonationRecord>>;

    /// Set the status of every record for a charge, returning how many changed
    async fn update_status_by_charge(&self, charge_id: &str, status: DonationStatus) -> Result<u64>;

    /// All records for a charge
    async fn find_by_charge(&self, charge_id: &str) -> Result<Vec<DonationRecord>>;

    /// Store name
    fn name(&self) -> &str;
}

/// In-memory donation store (for development)
#[derive(Default)]
pub struct MemoryDonationStore {
    records: RwLock<Vec<DonationRecord>>,
}

impl MemoryDonationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing records, duplicates included
    pub fn with_records(records: Vec<DonationRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// Snapshot of every record
    pub async fn all(&self) -> Vec<DonationRecord> {
        self.records.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl DonationStore for MemoryDonationStore {
    async fn insert_if_absent(&self, donation: NewDonation) -> Result<Option<DonationRecord>> {
        let mut records = self.records.write().await;

        if records
            .iter()
            .any(|r| r.external_charge_id == donation.external_charge_id)
        {
            return Ok(None);
        }

        let record = DonationRecord::create(donation);
        records.push(record.clone());
        Ok(Some(record))
    }

    async fn update_status_by_charge(&self, charge_id: &str, status: DonationStatus) -> Result<u64> {
        let mut records = self.records.write().await;
        let now = Utc::now();
        let mut updated = 0;

        for record in records.iter_mut().filter(|r| r.external_charge_id == charge_id) {
            record.status = status;
            record.updated_at = now;
            updated += 1;
        }

        Ok(updated)
    }

    async fn find_by_charge(&self, charge_id: &str) -> Result<Vec<DonationRecord>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.external_charge_id == charge_id)
            .cloned()
            .collect())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
