//! Application state.

use std::sync::Arc;

use coingram_store::RocksStore;

use crate::config::ServiceConfig;
use crate::payments::CheckoutClient;
use crate::push::PushClient;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The storage backend.
    pub store: Arc<RocksStore>,

    /// Service configuration.
    pub config: ServiceConfig,

    /// Push client for delivery notifications.
    pub push: Arc<PushClient>,

    /// Payment provider client (optional).
    pub payments: Option<Arc<CheckoutClient>>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(store: Arc<RocksStore>, config: ServiceConfig) -> Self {
        let push = Arc::new(PushClient::new(&config.push_api_url));

        // Create payment client if configured
        let payments = config.payment_api_key.as_ref().map(|key| {
            tracing::info!("Payment integration enabled");
            Arc::new(CheckoutClient::new(&config.payment_api_url, key))
        });

        if payments.is_none() {
            tracing::warn!("Payment provider not configured - coin purchases will not be available");
        }

        if config.payment_webhook_secret.is_none() {
            tracing::warn!(
                "Payment webhook secret not configured - all payment webhooks will be rejected"
            );
        }

        Self {
            store,
            config,
            push,
            payments,
        }
    }

    /// Check if the payment provider is configured.
    #[must_use]
    pub fn has_payments(&self) -> bool {
        self.payments.is_some()
    }
}
