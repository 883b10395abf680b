//! Payment webhook handler.
//!
//! Reconciliation per event: Received → VerifiedSignature →
//! (seen before) Skipped | Applied. The credit and the processed marker land
//! in one storage batch, so redelivery can never double-credit and a crash
//! can never strand an event half-applied.

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Serialize;

use coingram_core::{bundle_for_amount, AccountId, PurchaseEvent};
use coingram_store::{PurchaseOutcome, Store};

use crate::error::ApiError;
use crate::payments::{self, PaymentWebhook};
use crate::state::AppState;

/// Webhook response.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    /// Whether the webhook was processed.
    pub received: bool,
    /// What happened: "applied", "skipped", or "ignored".
    pub outcome: String,
}

/// Handle payment provider webhooks.
pub async fn payments_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<WebhookResponse>, ApiError> {
    // Unsigned bodies are never trusted: without a configured secret every
    // webhook is rejected.
    let Some(secret) = state.config.payment_webhook_secret.as_deref() else {
        tracing::warn!("Rejecting payment webhook: no webhook secret configured");
        return Err(ApiError::BadSignature);
    };

    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::BadSignature)?;

    payments::verify_webhook_signature(secret, &body, signature).map_err(|e| {
        tracing::warn!(error = %e, "Invalid payment webhook signature");
        ApiError::BadSignature
    })?;

    let webhook: PaymentWebhook =
        serde_json::from_str(&body).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    tracing::info!(
        event_type = %webhook.event_type,
        event_id = %webhook.id,
        "Received payment webhook"
    );

    let outcome = match webhook.event_type.as_str() {
        "checkout.session.completed" => {
            handle_checkout_completed(&state, &webhook.id, &webhook.data.object)?
        }
        _ => {
            tracing::debug!(event_type = %webhook.event_type, "Unhandled payment event");
            "ignored".to_string()
        }
    };

    Ok(Json(WebhookResponse {
        received: true,
        outcome,
    }))
}

/// Convert a completed checkout session into a coin credit, exactly once.
fn handle_checkout_completed(
    state: &AppState,
    event_id: &str,
    data: &serde_json::Value,
) -> Result<String, ApiError> {
    let payment_status = data
        .get("payment_status")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown");

    // Only credit completed payments.
    if payment_status != "paid" {
        tracing::info!(
            event_id = %event_id,
            payment_status = %payment_status,
            "Checkout session not paid, ignoring"
        );
        return Ok("ignored".to_string());
    }

    let account_str = data
        .get("client_reference_id")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ApiError::BadRequest("missing client_reference_id".into()))?;

    let account: AccountId = account_str
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid client_reference_id: {account_str}")))?;

    let amount_cents = data
        .get("amount_total")
        .and_then(serde_json::Value::as_i64)
        .ok_or_else(|| ApiError::BadRequest("missing amount_total".into()))?;

    // Only exact bundle amounts are credited; anything else is a
    // misconfigured or forged session, not a pro-rata credit.
    let bundle = bundle_for_amount(&state.config.bundles, amount_cents).ok_or_else(|| {
        tracing::warn!(
            event_id = %event_id,
            amount_cents = %amount_cents,
            "Payment amount matches no bundle"
        );
        ApiError::BadRequest(format!("unrecognized payment amount: {amount_cents}"))
    })?;

    let event = PurchaseEvent {
        event_id: event_id.to_string(),
        account: account.clone(),
        amount_cents,
        credited_coins: bundle.coins,
        processed_at: chrono::Utc::now(),
    };

    match state.store.apply_purchase(&event)? {
        PurchaseOutcome::Applied { new_balance } => {
            tracing::info!(
                event_id = %event_id,
                account = %account,
                coins = %bundle.coins,
                new_balance = %new_balance,
                "Purchase credited"
            );
            Ok("applied".to_string())
        }
        PurchaseOutcome::Skipped => {
            tracing::info!(
                event_id = %event_id,
                "Purchase event already processed, skipping"
            );
            Ok("skipped".to_string())
        }
    }
}
