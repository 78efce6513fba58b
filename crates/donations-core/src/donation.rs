//! Donation Records
//!
//! The durable record of one payment outcome.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::metadata::DonorMetadata;
use crate::money::from_minor_units;
use crate::status::DonationStatus;

/// Payment method tag; Stripe is the only integrated processor
pub const PAYMENT_METHOD_STRIPE: &str = "stripe";

/// A persisted donation record
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationRecord {
    pub id: Uuid,

    /// Processor charge id (`ch_...`)
    pub external_charge_id: String,

    /// Amount in major units
    pub amount: Decimal,

    /// Upper-case ISO currency code
    pub currency: String,

    pub donor_name: String,
    pub donor_email: String,
    pub message: Option<String>,
    pub payment_method: String,
    pub is_recurring: bool,
    pub project_id: Option<String>,
    pub status: DonationStatus,
    pub is_anonymous: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A donation record about to be written
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewDonation {
    pub external_charge_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub donor_name: String,
    pub donor_email: String,
    pub message: Option<String>,
    pub payment_method: String,
    pub is_recurring: bool,
    pub project_id: Option<String>,
    pub status: DonationStatus,
    pub is_anonymous: bool,
}

impl NewDonation {
    /// Map a processor charge plus recovered session metadata to a record.
    pub fn from_charge(
        charge_id: impl Into<String>,
        amount_minor: i64,
        currency: &str,
        donor: DonorMetadata,
        status: DonationStatus,
    ) -> Self {
        Self {
            external_charge_id: charge_id.into(),
            amount: from_minor_units(amount_minor),
            currency: currency.to_uppercase(),
            donor_name: donor.donor_name,
            donor_email: donor.donor_email,
            message: donor.message,
            payment_method: PAYMENT_METHOD_STRIPE.to_string(),
            is_recurring: donor.is_recurring,
            project_id: donor.project_id,
            status,
            is_anonymous: donor.is_anonymous,
        }
    }
}

impl DonationRecord {
    /// Assign identity and timestamps to a new donation
    pub fn create(new: NewDonation) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            external_charge_id: new.external_charge_id,
            amount: new.amount,
            currency: new.currency,
            donor_name: new.donor_name,
            donor_email: new.donor_email,
            message: new.message,
            payment_method: new.payment_method,
            is_recurring: new.is_recurring,
            project_id: new.project_id,
            status: new.status,
            is_anonymous: new.is_anonymous,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn donor() -> DonorMetadata {
        DonorMetadata {
            donor_name: "Jane Doe".into(),
            donor_email: "jane@example.com".into(),
            message: None,
            project_id: Some("proj_1".into()),
            is_recurring: false,
            is_anonymous: true,
        }
    }

    #[test]
    fn test_from_charge_converts_amount_and_currency() {
        let new = NewDonation::from_charge("ch_1", 25000, "zmw", donor(), DonationStatus::Completed);
        assert_eq!(new.amount, dec!(250));
        assert_eq!(new.currency, "ZMW");
        assert_eq!(new.payment_method, PAYMENT_METHOD_STRIPE);
        assert_eq!(new.project_id.as_deref(), Some("proj_1"));
    }

    #[test]
    fn test_create_assigns_identity() {
        let new = NewDonation::from_charge("ch_1", 100, "zmw", donor(), DonationStatus::Failed);
        let a = DonationRecord::create(new.clone());
        let b = DonationRecord::create(new);
        assert_ne!(a.id, b.id);
        assert_eq!(a.created_at, a.updated_at);
        assert!(a.is_anonymous);
    }
}
