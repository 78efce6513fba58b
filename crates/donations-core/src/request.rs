//! Donation Requests
//!
//! Inbound checkout payload and its validated form.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{DonationError, Result};
use crate::money::{MINIMUM_AMOUNT, to_minor_units};

/// Checkout payload as submitted by the donation form.
///
/// Every field is optional at the wire level so that absent values surface
/// as validation errors rather than deserialization failures.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationRequest {
    /// Amount in major units (kwacha)
    #[serde(default)]
    pub amount: Option<Decimal>,

    #[serde(default)]
    pub donor_name: Option<String>,

    #[serde(default)]
    pub donor_email: Option<String>,

    /// Free-text note from the donor
    #[serde(default)]
    pub message: Option<String>,

    /// Project the donation is earmarked for
    #[serde(default)]
    pub project_id: Option<String>,

    #[serde(default)]
    pub is_recurring: Option<bool>,

    #[serde(default)]
    pub is_anonymous: Option<bool>,
}

/// A donation request that passed validation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedDonation {
    pub amount: Decimal,
    pub amount_minor: i64,
    pub donor_name: String,
    pub donor_email: String,
    pub message: Option<String>,
    pub project_id: Option<String>,
    pub is_recurring: bool,
    pub is_anonymous: bool,
}

impl DonationRequest {
    /// Validate the request: amount present and at least 1, donor name and
    /// email present and non-blank.
    pub fn validate(self) -> Result<ValidatedDonation> {
        let amount = self
            .amount
            .ok_or_else(|| DonationError::InvalidAmount("amount is required".into()))?;
        if amount < MINIMUM_AMOUNT {
            return Err(DonationError::InvalidAmount(format!(
                "{amount} is below the minimum of {MINIMUM_AMOUNT}"
            )));
        }
        let amount_minor = to_minor_units(amount)
            .ok_or_else(|| DonationError::InvalidAmount(format!("{amount} is too large")))?;

        let donor_name = non_blank(self.donor_name).ok_or(DonationError::MissingField("donorName"))?;
        let donor_email =
            non_blank(self.donor_email).ok_or(DonationError::MissingField("donorEmail"))?;

        Ok(ValidatedDonation {
            amount,
            amount_minor,
            donor_name,
            donor_email,
            message: non_blank(self.message),
            project_id: non_blank(self.project_id),
            is_recurring: self.is_recurring.unwrap_or(false),
            is_anonymous: self.is_anonymous.unwrap_or(false),
        })
    }
}

/// Treat blank strings as absent; non-blank values pass through untouched
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
