//! Server Configuration
//!
//! Read from the environment (optionally seeded from `.env`).

/// Stripe credentials
#[derive(Clone, Debug)]
pub struct StripeConfig {
    pub secret_key: String,
    pub webhook_secret: String,
}

/// Database connection settings
#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Server configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Listen address
    pub bind_addr: String,

    /// Public site URL used for checkout redirects
    pub app_base_url: String,

    /// `None` when either Stripe variable is unset
    pub stripe: Option<StripeConfig>,

    /// `None` when `DATABASE_URL` is unset
    pub database: Option<DatabaseConfig>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source; blank values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let stripe = match (var("STRIPE_SECRET_KEY"), var("STRIPE_WEBHOOK_SECRET")) {
            (Some(secret_key), Some(webhook_secret)) => Some(StripeConfig {
                secret_key,
                webhook_secret,
            }),
            _ => None,
        };

        let database = var("DATABASE_URL").map(|url| DatabaseConfig {
            url,
            max_connections: var("DATABASE_MAX_CONNECTIONS")
                .and_then(|n| n.parse().ok())
                .unwrap_or(5),
        });

        Self {
            bind_addr: var("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".into()),
            app_base_url: var("APP_BASE_URL").unwrap_or_else(|| "http://localhost:3000".into()),
            stripe,
            database,
        }
    }
}
