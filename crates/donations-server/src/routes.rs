//! Router

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{create_checkout, health_check, stripe_webhook};
use crate::state::AppState;

/// Build the application router
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/donations/checkout", post(create_checkout))
        .route("/api/webhooks/stripe", post(stripe_webhook))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
