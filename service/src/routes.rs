//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{accounts, health, ledger, mailbox, purchases, webhooks};
use crate::state::AppState;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /health` - Health check
///
/// ## Accounts
/// - `POST /v1/accounts` - Register (idempotent)
/// - `GET /v1/accounts/:id` - Get an account
/// - `POST /v1/accounts/:id/device-token` - Register a push token
/// - `POST /v1/accounts/:id/unlock` - Unlock unlimited mode
///
/// ## Ledger
/// - `POST /v1/send` - Send an item (debit + deliver)
/// - `POST /v1/gift` - Gift coins
///
/// ## Mailbox
/// - `POST /v1/mailbox/take` - Take the pending delivery
/// - `POST /v1/mailbox/flush` - Flush the slot
/// - `POST /v1/mailbox/archive` - Keep a payload in the memory bank
/// - `GET /v1/mailbox/memory` - List archived payloads
///
/// ## Purchases
/// - `POST /v1/purchase` - Create a checkout session
///
/// ## Webhooks (signature verification)
/// - `POST /webhooks/payments` - Payment provider webhooks
pub fn create_router(state: AppState) -> Router {
    // Extract config values before moving state
    let cors_origins = state.config.cors_origins.clone();
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    // Build CORS layer
    let cors = build_cors_layer(&cors_origins);

    let state = Arc::new(state);

    Router::new()
        // Health (public)
        .route("/health", get(health::health))
        // Accounts
        .route("/v1/accounts", post(accounts::register))
        .route("/v1/accounts/:id", get(accounts::get_account))
        .route(
            "/v1/accounts/:id/device-token",
            post(accounts::register_device_token),
        )
        .route("/v1/accounts/:id/unlock", post(accounts::unlock))
        // Ledger
        .route("/v1/send", post(ledger::send))
        .route("/v1/gift", post(ledger::gift))
        // Mailbox
        .route("/v1/mailbox/take", post(mailbox::take))
        .route("/v1/mailbox/flush", post(mailbox::flush))
        .route("/v1/mailbox/archive", post(mailbox::archive))
        .route("/v1/mailbox/memory", get(mailbox::memory))
        // Purchases
        .route("/v1/purchase", post(purchases::purchase))
        // Webhooks
        .route("/webhooks/payments", post(webhooks::payments_webhook))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
