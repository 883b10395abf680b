//! API error types and responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Bad request - invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The send/gift target is not a registered account.
    #[error("invalid recipient: {0}")]
    InvalidRecipient(String),

    /// Non-positive or otherwise malformed amount.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Item kind not present in the pricing table.
    #[error("unknown item kind: {0}")]
    UnknownItemKind(String),

    /// Insufficient coins for the requested operation.
    #[error("insufficient funds: balance={balance}, required={required}")]
    InsufficientFunds {
        /// Current balance.
        balance: i64,
        /// Required amount.
        required: i64,
    },

    /// Webhook signature missing or invalid.
    #[error("bad signature")]
    BadSignature,

    /// Wrong unlock code.
    #[error("invalid code")]
    InvalidCode,

    /// Upstream provider (push or payments) unavailable or misbehaving.
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone(), None),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone(), None),
            Self::InvalidRecipient(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "invalid_recipient",
                msg.clone(),
                None,
            ),
            Self::InvalidAmount(msg) => (
                StatusCode::BAD_REQUEST,
                "invalid_amount",
                msg.clone(),
                None,
            ),
            Self::UnknownItemKind(kind) => (
                StatusCode::BAD_REQUEST,
                "unknown_item_kind",
                format!("unknown item kind: {kind}"),
                None,
            ),
            Self::InsufficientFunds { balance, required } => (
                StatusCode::PAYMENT_REQUIRED,
                "insufficient_funds",
                self.to_string(),
                Some(serde_json::json!({
                    "balance": balance,
                    "required": required
                })),
            ),
            Self::BadSignature => (
                StatusCode::BAD_REQUEST,
                "bad_signature",
                "webhook signature missing or invalid".to_string(),
                None,
            ),
            Self::InvalidCode => (
                StatusCode::FORBIDDEN,
                "invalid_code",
                "invalid unlock code".to_string(),
                None,
            ),
            Self::UpstreamUnavailable(msg) => (
                StatusCode::BAD_GATEWAY,
                "upstream_unavailable",
                msg.clone(),
                None,
            ),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<coingram_store::StoreError> for ApiError {
    fn from(err: coingram_store::StoreError) -> Self {
        match err {
            coingram_store::StoreError::NotFound { entity: "recipient", id } => {
                Self::InvalidRecipient(format!("recipient not registered: {id}"))
            }
            coingram_store::StoreError::NotFound { entity, id } => {
                Self::NotFound(format!("{entity} not found: {id}"))
            }
            coingram_store::StoreError::InsufficientFunds { balance, required } => {
                Self::InsufficientFunds { balance, required }
            }
            coingram_store::StoreError::DuplicateEvent { event_id } => {
                // Duplicate events are skipped by the reconciler; reaching
                // here means a handler misused the store API.
                Self::Internal(format!("unexpected duplicate event: {event_id}"))
            }
            coingram_store::StoreError::Database(msg)
            | coingram_store::StoreError::Serialization(msg) => Self::Internal(msg),
        }
    }
}

impl From<coingram_core::PricingError> for ApiError {
    fn from(err: coingram_core::PricingError) -> Self {
        match err {
            coingram_core::PricingError::UnknownKind(kind) => Self::UnknownItemKind(kind),
        }
    }
}

impl From<coingram_core::IdError> for ApiError {
    fn from(err: coingram_core::IdError) -> Self {
        Self::BadRequest(err.to_string())
    }
}
