//! Checkout Session Metadata
//!
//! Donor context travels on the hosted checkout session as string metadata
//! and is read back when the charge webhook arrives.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::request::{ValidatedDonation, non_blank};

pub const DONOR_NAME: &str = "donorName";
pub const DONOR_EMAIL: &str = "donorEmail";
pub const MESSAGE: &str = "message";
pub const PROJECT_ID: &str = "projectId";
pub const IS_RECURRING: &str = "isRecurring";
pub const IS_ANONYMOUS: &str = "isAnonymous";

/// Donor fields carried from checkout to webhook
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonorMetadata {
    pub donor_name: String,
    pub donor_email: String,
    pub message: Option<String>,
    pub project_id: Option<String>,
    pub is_recurring: bool,
    pub is_anonymous: bool,
}

impl DonorMetadata {
    /// Flatten into processor metadata.
    ///
    /// Optional fields are only present when set; `isAnonymous` only when true.
    pub fn to_map(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert(DONOR_NAME.to_string(), self.donor_name.clone());
        map.insert(DONOR_EMAIL.to_string(), self.donor_email.clone());
        if let Some(message) = &self.message {
            map.insert(MESSAGE.to_string(), message.clone());
        }
        if let Some(project_id) = &self.project_id {
            map.insert(PROJECT_ID.to_string(), project_id.clone());
        }
        map.insert(IS_RECURRING.to_string(), self.is_recurring.to_string());
        if self.is_anonymous {
            map.insert(IS_ANONYMOUS.to_string(), "true".to_string());
        }
        map
    }

    /// Recover donor fields from processor metadata.
    ///
    /// Returns `None` unless both donor name and email are present.
    pub fn from_map(map: &HashMap<String, String>) -> Option<Self> {
        let field = |key: &str| non_blank(map.get(key).cloned());

        Some(Self {
            donor_name: field(DONOR_NAME)?,
            donor_email: field(DONOR_EMAIL)?,
            message: field(MESSAGE),
            project_id: field(PROJECT_ID),
            is_recurring: flag(map, IS_RECURRING),
            is_anonymous: flag(map, IS_ANONYMOUS),
        })
    }
}

impl From<&ValidatedDonation> for DonorMetadata {
    fn from(donation: &ValidatedDonation) -> Self {
        Self {
            donor_name: donation.donor_name.clone(),
            donor_email: donation.donor_email.clone(),
            message: donation.message.clone(),
            project_id: donation.project_id.clone(),
            is_recurring: donation.is_recurring,
            is_anonymous: donation.is_anonymous,
        }
    }
}

fn flag(map: &HashMap<String, String>, key: &str) -> bool {
    map.get(key).is_some_and(|v| v.eq_ignore_ascii_case("true"))
}
