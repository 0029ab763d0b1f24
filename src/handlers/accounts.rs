//! Account management HTTP handlers.
//!
//! This module implements the account-related API endpoints:
//! - POST /accounts - Open a new account and receive a session token
//! - GET /accounts - List all accounts
//! - GET /accounts/{id} - Get account by id (ownership guarded)
//! - DELETE /accounts/{id} - Delete account (ownership guarded)

use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

use super::json_body;
use crate::{
    error::AppError,
    middleware::auth::AccountOwner,
    models::account::{AccountResponse, CreateAccountRequest},
    services::account_service,
    state::AppState,
};

/// Open a new account.
///
/// # Endpoint
///
/// `POST /accounts`
///
/// # Request Body
///
/// ```json
/// {
///   "first_name": "Ada",
///   "last_name": "Lovelace",
///   "password": "hunter2"
/// }
/// ```
///
/// # Response
///
/// - **Success (201 Created)**: a session token for the new account, as a JSON string
/// - **Error (400)**: malformed body or store failure
///
/// The account starts with a zero balance and a randomly assigned number.
pub async fn create_account(
    State(state): State<AppState>,
    payload: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<String>), AppError> {
    let request = json_body(payload)?;

    let account = account_service::open_account(state.store.as_ref(), request).await?;
    let token = state.tokens.issue(&account)?;

    Ok((StatusCode::CREATED, Json(token)))
}

/// List all accounts.
///
/// # Endpoint
///
/// `GET /accounts`
///
/// # Response
///
/// - **Success (200 OK)**: array of accounts (may be empty), oldest first
pub async fn list_accounts(
    State(state): State<AppState>,
) -> Result<Json<Vec<AccountResponse>>, AppError> {
    let accounts = state.store.list_accounts().await?;

    Ok(Json(accounts.into_iter().map(Into::into).collect()))
}

/// Get the caller's account.
///
/// # Endpoint
///
/// `GET /accounts/{id}`
///
/// # Authentication
///
/// Requires a session token for this account in `x-jwt-token`; the ownership
/// guard has already resolved `{id}` before this handler runs.
pub async fn get_account(
    State(state): State<AppState>,
    Extension(owner): Extension<AccountOwner>,
) -> Result<Json<AccountResponse>, AppError> {
    let account = state.store.get_account_by_id(owner.account_id).await?;

    Ok(Json(account.into()))
}

/// Delete the caller's account.
///
/// # Endpoint
///
/// `DELETE /accounts/{id}`
///
/// Tokens issued for the account stay well-formed afterwards but no longer
/// pass the ownership guard, since the account cannot be loaded.
pub async fn delete_account(
    State(state): State<AppState>,
    Extension(owner): Extension<AccountOwner>,
) -> Result<Json<&'static str>, AppError> {
    state.store.delete_account(owner.account_id).await?;
    tracing::info!(id = owner.account_id, "account deleted");

    Ok(Json("deleted successfully"))
}
