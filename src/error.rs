//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{
    auth::{password::HashError, token::TokenError},
    services::transfer_service::TransferError,
    store::StoreError,
};

/// Application-wide error type.
///
/// # Error Categories
///
/// - **Validation**: malformed request body or parameters
/// - **Authorization**: missing, invalid or mismatched session token
/// - **Transfer**: invalid amount, unknown account, insufficient balance, self transfer
/// - **Store**: persistence failures and account lookups that found nothing
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Request body or parameters are invalid.
    #[error("{0}")]
    InvalidRequest(String),

    /// Caller is not allowed to act on the requested account.
    ///
    /// Deliberately carries no detail about which check failed.
    #[error("permission denied")]
    PermissionDenied,

    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Hash(#[from] HashError),
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// ```json
/// { "error": "insufficient balance" }
/// ```
///
/// # Status Code Mapping
///
/// - `PermissionDenied` → 403 Forbidden, always with the body `{"error":"permission denied"}`
/// - everything else → 400 Bad Request with the error's message, including
///   accounts that were not found and store failures
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::PermissionDenied => StatusCode::FORBIDDEN,
            _ => StatusCode::BAD_REQUEST,
        };

        let body = Json(json!({ "error": self.to_string() }));

        (status, body).into_response()
    }
}
