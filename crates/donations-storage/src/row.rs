//! Donation table rows

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use donations_core::{DonationRecord, DonationStatus};

use crate::error::Error;

#[derive(Clone, Debug, FromRow, PartialEq, Eq)]
pub struct DonationRow {
    pub id: Uuid,
    pub external_charge_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub donor_name: String,
    pub donor_email: String,
    pub message: Option<String>,
    pub payment_method: String,
    pub is_recurring: bool,
    pub project_id: Option<String>,
    pub status: String,
    pub is_anonymous: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DonationRow> for DonationRecord {
    type Error = Error;

    fn try_from(row: DonationRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<DonationStatus>()
            .map_err(|e| Error::Decode(format!("donation {}: {e}", row.id)))?;

        Ok(Self {
            id: row.id,
            external_charge_id: row.external_charge_id,
            amount: row.amount,
            currency: row.currency,
            donor_name: row.donor_name,
            donor_email: row.donor_email,
            message: row.message,
            payment_method: row.payment_method,
            is_recurring: row.is_recurring,
            project_id: row.project_id,
            status,
            is_anonymous: row.is_anonymous,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
