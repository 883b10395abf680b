//! Coin purchase handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use coingram_core::{bundle_for_coins, AccountId};
use coingram_store::Store;

use crate::error::ApiError;
use crate::state::AppState;

/// Purchase request.
#[derive(Debug, Deserialize)]
pub struct PurchaseRequest {
    /// Buying account.
    pub account_id: String,
    /// Bundle size in coins. Must match one of the configured bundles.
    pub coins: i64,
}

/// Purchase response.
#[derive(Debug, Serialize)]
pub struct PurchaseResponse {
    /// Checkout URL to redirect the user to.
    pub checkout_url: String,
    /// Session ID for tracking.
    pub session_id: String,
}

/// Initiate a coin purchase via the payment provider.
///
/// The coins land later, when the provider's completion webhook is
/// reconciled; this call only opens the checkout session.
pub async fn purchase(
    State(state): State<Arc<AppState>>,
    Json(body): Json<PurchaseRequest>,
) -> Result<Json<PurchaseResponse>, ApiError> {
    let account_id: AccountId = body.account_id.parse()?;

    let bundle = bundle_for_coins(&state.config.bundles, body.coins).ok_or_else(|| {
        ApiError::BadRequest(format!("no {} coin bundle is offered", body.coins))
    })?;

    let payments = state
        .payments
        .as_ref()
        .ok_or_else(|| ApiError::UpstreamUnavailable("payment provider not configured".into()))?;

    // Verify the account exists before sending anyone to checkout.
    state
        .store
        .get_account(&account_id)?
        .ok_or_else(|| ApiError::NotFound(format!("account not found: {account_id}")))?;

    let success_url = format!(
        "{}/purchase/success?session_id={{CHECKOUT_SESSION_ID}}",
        state.config.frontend_url
    );
    let cancel_url = format!("{}/purchase/cancel", state.config.frontend_url);

    let session = payments
        .create_checkout_session(account_id.as_str(), bundle, &success_url, &cancel_url)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to create checkout session");
            ApiError::UpstreamUnavailable(format!("failed to create checkout session: {e}"))
        })?;

    let checkout_url = session
        .url
        .ok_or_else(|| ApiError::UpstreamUnavailable("provider returned no checkout URL".into()))?;

    tracing::info!(
        account = %account_id,
        coins = %bundle.coins,
        session_id = %session.id,
        "Checkout session created"
    );

    Ok(Json(PurchaseResponse {
        checkout_url,
        session_id: session.id,
    }))
}
