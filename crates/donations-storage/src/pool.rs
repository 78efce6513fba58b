//! Connection Pool

use std::time::Duration;

use sqlx::{Pool, Postgres, postgres::PgPoolOptions};

use crate::error::Error;
use crate::store::PgDonationStore;

/// Pool settings
#[derive(Clone, Debug)]
pub struct PoolConfig {
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout: Duration,
}

impl PoolConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 5,
            connect_timeout: Duration::from_secs(5),
        }
    }

    #[must_use]
    pub fn max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }
}

/// Wrapper around `sqlx::Pool<Postgres>`.
#[derive(Clone)]
pub struct PgPool {
    inner: Pool<Postgres>,
}

impl PgPool {
    /// Connects to the configured postgres URI and returns the connected pool.
    pub async fn connect(config: &PoolConfig) -> Result<Self, Error> {
        let inner = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout)
            .connect(&config.url)
            .await?;
        Ok(Self { inner })
    }

    /// Run migrations.
    pub async fn run_migrations(&self) -> Result<(), Error> {
        sqlx::migrate!().run(&self.inner).await?;
        tracing::debug!("Database migrations applied");
        Ok(())
    }

    /// Donation store sharing this pool's connections.
    pub fn donation_store(&self) -> PgDonationStore {
        PgDonationStore::new(self.inner.clone())
    }
}
