//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, owner context, etc.)
//! 2. Calls into the services or the account store
//! 3. Returns HTTP response (JSON, status code)

use axum::{Json, extract::rejection::JsonRejection};

use crate::error::AppError;

/// Account management endpoints
pub mod accounts;
/// Login endpoint
pub mod auth;
/// Health check endpoint
pub mod health;
/// Fund transfer endpoint
pub mod transfers;

/// Unwrap a JSON body, turning a decode failure into a 400 with the decoder's message.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::InvalidRequest(rejection.body_text()))
}
