//! Account management handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use coingram_core::{Account, AccountId, PhoneNumber};
use coingram_store::Store;

use crate::error::ApiError;
use crate::state::AppState;

/// Account response.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    /// Account id.
    pub account_id: String,
    /// Normalized phone number.
    pub phone: String,
    /// Balance as clients should display it (sentinel for unlimited).
    pub balance: i64,
    /// Whether the account is exempt from debit checks.
    pub unlimited: bool,
    /// Whether a push token is registered.
    pub has_device_token: bool,
    /// Created timestamp.
    pub created_at: String,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            account_id: account.id.to_string(),
            phone: account.phone.to_string(),
            balance: account.display_balance(),
            unlimited: account.unlimited,
            has_device_token: account.device_token.is_some(),
            created_at: account.created_at.to_rfc3339(),
        }
    }
}

/// Register account request.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Phone number in any common written form.
    pub phone: String,
}

/// Register response.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// The registered account.
    #[serde(flatten)]
    pub account: AccountResponse,
    /// Whether the account was created by this call.
    pub created: bool,
}

/// Create or refresh an account.
///
/// Idempotent: re-registering an existing phone number refreshes identity
/// fields only and never resets the balance.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let phone = PhoneNumber::parse(&body.phone)?;

    let (account, created) = state
        .store
        .register_account(&phone, state.config.starting_grant)?;

    tracing::info!(
        account = %account.id,
        created = %created,
        "Account registered"
    );

    Ok(Json(RegisterResponse {
        account: AccountResponse::from(&account),
        created,
    }))
}

/// Get an account by id.
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<String>,
) -> Result<Json<AccountResponse>, ApiError> {
    let account_id: AccountId = account_id.parse()?;

    let account = state
        .store
        .get_account(&account_id)?
        .ok_or_else(|| ApiError::NotFound(format!("account not found: {account_id}")))?;

    Ok(Json(AccountResponse::from(&account)))
}

/// Device token registration request.
#[derive(Debug, Deserialize)]
pub struct DeviceTokenRequest {
    /// Push token for the account's device.
    pub token: String,
}

/// Store a push device token on an account.
pub async fn register_device_token(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<String>,
    Json(body): Json<DeviceTokenRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let account_id: AccountId = account_id.parse()?;

    if body.token.trim().is_empty() {
        return Err(ApiError::BadRequest("empty device token".into()));
    }

    state.store.set_device_token(&account_id, &body.token)?;

    tracing::info!(account = %account_id, "Device token registered");

    Ok(Json(serde_json::json!({ "saved": true })))
}

/// Unlock request.
#[derive(Debug, Deserialize)]
pub struct UnlockRequest {
    /// The unlock code.
    pub code: String,
}

/// Flip an account to unlimited when the submitted code matches.
pub async fn unlock(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<String>,
    Json(body): Json<UnlockRequest>,
) -> Result<Json<AccountResponse>, ApiError> {
    let account_id: AccountId = account_id.parse()?;

    let expected = state
        .config
        .unlock_code
        .as_deref()
        .ok_or(ApiError::InvalidCode)?;

    if body.code != expected {
        return Err(ApiError::InvalidCode);
    }

    state.store.set_unlimited(&account_id)?;

    let account = state
        .store
        .get_account(&account_id)?
        .ok_or_else(|| ApiError::NotFound(format!("account not found: {account_id}")))?;

    tracing::info!(account = %account_id, "Account unlocked");

    Ok(Json(AccountResponse::from(&account)))
}
