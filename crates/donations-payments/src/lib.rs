//! # donations-payments
//!
//! Stripe integration for the donation flow.
//!
//! ```text
//! ┌──────────────────┐     ┌─────────────────┐     ┌──────────────────┐
//! │ CheckoutInitiator│────▶│  Stripe Hosted  │────▶│  WebhookReceiver │
//! │ (session + meta) │     │  Checkout Page  │     │  (charge.*)      │
//! └──────────────────┘     └─────────────────┘     └────────┬─────────┘
//!                                                           │
//!                                                  ┌────────▼─────────┐
//!                                                  │   LedgerWriter   │
//!                                                  └──────────────────┘
//! ```
//!
//! The initiator attaches donor details to the hosted session as metadata.
//! When a charge settles, Stripe calls the webhook; the receiver verifies
//! the signature, finds the session that produced the charge and writes one
//! donation record per charge.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use donations_payments::{CheckoutInitiator, RedirectUrls, StripeGateway};
//!
//! let gateway = Arc::new(StripeGateway::new("sk_test_xxx"));
//! let initiator = CheckoutInitiator::new(gateway, RedirectUrls::from_base_url("https://example.org"));
//!
//! let session = initiator.initiate(request).await?;
//! // Redirect donor to: session.url
//! ```

mod checkout;
mod error;
pub mod gateway;
mod ledger;
pub mod signature;
mod webhook;

pub use checkout::{CheckoutInitiator, RedirectUrls};
pub use error::{PaymentError, Result};
pub use gateway::{HostedSession, MockGateway, PaymentGateway, SessionMode, SessionRequest, StripeGateway};
pub use ledger::{LedgerWrite, LedgerWriter};
pub use webhook::{Charge, EventKind, SkipReason, WebhookEvent, WebhookOutcome, WebhookReceiver};
