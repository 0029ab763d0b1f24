//! Login handler.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

use super::json_body;
use crate::{
    error::AppError, models::account::LoginRequest, services::account_service, state::AppState,
};

/// Exchange an account number and password for a session token.
///
/// # Endpoint
///
/// `POST /login`
///
/// # Request Body
///
/// ```json
/// { "number": 482913, "password": "hunter2" }
/// ```
///
/// # Response
///
/// - **Success (201 Created)**: the token as a JSON string
/// - **Error (403)**: wrong password, body `{"error":"permission denied"}`
/// - **Error (400)**: malformed body or unknown account number
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<String>), AppError> {
    let request = json_body(payload)?;

    let account =
        account_service::authenticate(state.store.as_ref(), request.number, request.password)
            .await?;
    let token = state.tokens.issue(&account)?;

    Ok((StatusCode::CREATED, Json(token)))
}
