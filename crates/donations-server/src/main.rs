//! Donations HTTP Server
//!
//! Axum server for donation checkout and Stripe webhooks.

mod config;
mod handlers;
mod routes;
mod state;

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use donations_core::{DonationStore, MemoryDonationStore};
use donations_payments::StripeGateway;
use donations_storage::{PgPool, PoolConfig};

use crate::config::Config;
use crate::state::{AppState, Payments};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    // Initialize donation store
    let store: Arc<dyn DonationStore> = if let Some(database) = &config.database {
        let pool = PgPool::connect(
            &PoolConfig::new(&database.url).max_connections(database.max_connections),
        )
        .await?;
        pool.run_migrations().await?;
        tracing::info!("✓ Connected to PostgreSQL");
        Arc::new(pool.donation_store())
    } else {
        tracing::warn!("⚠ DATABASE_URL not set - donations kept in memory only");
        Arc::new(MemoryDonationStore::new())
    };

    // Initialize payments
    let payments = config.stripe.as_ref().map(|stripe| {
        Arc::new(Payments::new(
            Arc::new(StripeGateway::new(&stripe.secret_key)),
            store.clone(),
            &stripe.webhook_secret,
            &config.app_base_url,
        ))
    });

    if payments.is_some() {
        tracing::info!("✓ Stripe configured");
    } else {
        tracing::warn!("⚠ Stripe not configured - payments disabled");
        tracing::warn!("  Set STRIPE_SECRET_KEY and STRIPE_WEBHOOK_SECRET in .env");
    }

    let app = routes::app(AppState { payments, store });

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("🚀 donations server running on http://{}", config.bind_addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health                 - Health check");
    tracing::info!("  POST /api/donations/checkout - Create Stripe checkout");
    tracing::info!("  POST /api/webhooks/stripe    - Stripe webhook");

    axum::serve(listener, app).await?;

    Ok(())
}
