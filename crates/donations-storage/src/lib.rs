//! # donations-storage
//!
//! PostgreSQL implementation of `DonationStore` on `sqlx`.
//!
//! Migrations under `migrations/` are embedded at compile time and applied
//! with [`PgPool::run_migrations`]. The `donations` table carries a unique
//! index on `external_charge_id`, so a redelivered charge webhook inserts
//! nothing.
//!
//! ```rust,ignore
//! let pool = PgPool::connect(&PoolConfig::new(database_url)).await?;
//! pool.run_migrations().await?;
//! let store: Arc<dyn DonationStore> = Arc::new(pool.donation_store());
//! ```

mod error;
mod pool;
mod row;
mod store;

pub use error::Error;
pub use pool::{PgPool, PoolConfig};
pub use row::DonationRow;
pub use store::PgDonationStore;
