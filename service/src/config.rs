//! Service configuration.

use serde::Deserialize;
use std::path::Path;

use coingram_core::{default_bundles, CoinBundle, PricingTable};

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: "0.0.0.0:8080").
    pub listen_addr: String,

    /// Path to `RocksDB` data directory (default: "/data/coingram").
    pub data_dir: String,

    /// Coins granted on first registration (default: 50).
    pub starting_grant: i64,

    /// Unlock code that flips an account to unlimited (optional; the
    /// unlock endpoint rejects everything when unset).
    pub unlock_code: Option<String>,

    /// Push API base URL (Expo-compatible).
    pub push_api_url: String,

    /// Payment provider API base URL.
    pub payment_api_url: String,

    /// Payment provider API key (optional; checkout is unavailable without it).
    pub payment_api_key: Option<String>,

    /// Payment webhook signing secret (optional; webhooks are rejected
    /// without it - unsigned bodies are never trusted).
    pub payment_webhook_secret: Option<String>,

    /// Create gift recipients that are not yet registered, holding exactly
    /// the gifted amount. Off by default: orphaned balances are worse than a
    /// rejected gift.
    pub auto_vivify_gifts: bool,

    /// Frontend URL for checkout redirects.
    pub frontend_url: String,

    /// CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,

    /// Pricing table.
    pub pricing: PricingTable,

    /// Purchasable coin bundles.
    pub bundles: Vec<CoinBundle>,
}

/// Payment provider secrets file structure.
#[derive(Debug, Deserialize)]
struct PaymentSecrets {
    api_key: String,
    #[serde(default)]
    webhook_secret: Option<String>,
}

impl ServiceConfig {
    /// Load configuration from environment variables and secrets files.
    #[must_use]
    pub fn from_env() -> Self {
        // Try to load payment secrets from file first, then fall back to env vars
        let (payment_api_key, payment_webhook_secret) = load_payment_secrets();

        let pricing = PricingTable {
            allow_unknown_kinds: env_flag("ALLOW_UNKNOWN_ITEM_KINDS"),
            ..PricingTable::default()
        };

        Self {
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "/data/coingram".into()),
            starting_grant: std::env::var("STARTING_GRANT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(50),
            unlock_code: std::env::var("UNLOCK_CODE").ok(),
            push_api_url: std::env::var("PUSH_API_URL")
                .unwrap_or_else(|_| "https://exp.host/--/api/v2/push/send".into()),
            payment_api_url: std::env::var("PAYMENT_API_URL")
                .unwrap_or_else(|_| "https://api.stripe.com/v1".into()),
            payment_api_key,
            payment_webhook_secret,
            auto_vivify_gifts: env_flag("AUTO_VIVIFY_GIFTS"),
            frontend_url: std::env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            max_body_bytes: std::env::var("MAX_BODY_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1024 * 1024), // 1MB
            request_timeout_seconds: std::env::var("REQUEST_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            pricing,
            bundles: default_bundles(),
        }
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name).is_ok_and(|v| matches!(v.trim(), "1" | "true" | "yes"))
}

/// Load payment provider secrets from file or environment.
fn load_payment_secrets() -> (Option<String>, Option<String>) {
    let secret_paths = [
        ".secrets/payments.json",
        "coingram/.secrets/payments.json",
        "../.secrets/payments.json",
    ];

    for path in &secret_paths {
        if let Ok(secrets) = load_secrets_file::<PaymentSecrets>(path) {
            tracing::info!(path = %path, "Loaded payment secrets from file");
            return (Some(secrets.api_key), secrets.webhook_secret);
        }
    }

    tracing::debug!("Payment secrets file not found, using environment variables");
    (
        std::env::var("PAYMENT_API_KEY").ok(),
        std::env::var("PAYMENT_WEBHOOK_SECRET").ok(),
    )
}

/// Load secrets from a JSON file.
fn load_secrets_file<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, std::io::Error> {
    let path = Path::new(path);
    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Secrets file not found",
        ));
    }
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".into(),
            data_dir: "/data/coingram".into(),
            starting_grant: 50,
            unlock_code: None,
            push_api_url: "https://exp.host/--/api/v2/push/send".into(),
            payment_api_url: "https://api.stripe.com/v1".into(),
            payment_api_key: None,
            payment_webhook_secret: None,
            auto_vivify_gifts: false,
            frontend_url: "http://localhost:3000".into(),
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
            pricing: PricingTable::default(),
            bundles: default_bundles(),
        }
    }
}
