//! # donations-core
//!
//! Domain types for the donation ledger: records, statuses, checkout
//! requests, the metadata carried on hosted checkout sessions, and the
//! storage abstraction the ledger writes through.
//!
//! ## Flow
//!
//! ```text
//! ┌──────────────┐     ┌───────────────┐     ┌──────────────┐
//! │   Checkout   │────▶│    Stripe     │────▶│   Webhook    │
//! │  (metadata)  │     │  (hosted)     │     │  (charge.*)  │
//! └──────────────┘     └───────────────┘     └──────┬───────┘
//!                                                   │
//!                                           ┌───────▼───────┐
//!                                           │ DonationStore │
//!                                           └───────────────┘
//! ```
//!
//! `DonationStore` has an in-memory implementation here and a PostgreSQL
//! implementation in `donations-storage`.

pub mod donation;
pub mod error;
pub mod metadata;
pub mod money;
pub mod request;
pub mod status;
pub mod store;

pub use donation::{DonationRecord, NewDonation, PAYMENT_METHOD_STRIPE};
pub use error::{DonationError, Result};
pub use metadata::DonorMetadata;
pub use money::{CURRENCY, from_minor_units, to_minor_units};
pub use request::{DonationRequest, ValidatedDonation};
pub use status::DonationStatus;
pub use store::{DonationStore, MemoryDonationStore};
