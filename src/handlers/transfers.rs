//! Fund transfer handler.

use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
};

use super::json_body;
use crate::{
    error::AppError, middleware::auth::AccountOwner, models::transfer::TransferRequest,
    services::transfer_service, state::AppState,
};

/// Move funds out of the caller's account.
///
/// # Endpoint
///
/// `POST /accounts/transfer/{id}` (ownership guarded; `{id}` is the source account)
///
/// # Request Body
///
/// ```json
/// { "to_account": 2, "amount": 200 }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: `"transfer complete"`
/// - **Error (400)**: invalid amount, unknown account, insufficient balance, self transfer
/// - **Error (403)**: token does not own the source account
///
/// # Atomicity
///
/// Both balances are written in a single store transaction.
/// Either both change or neither does.
pub async fn transfer(
    State(state): State<AppState>,
    Extension(owner): Extension<AccountOwner>,
    payload: Result<Json<TransferRequest>, JsonRejection>,
) -> Result<Json<&'static str>, AppError> {
    let request = json_body(payload)?;

    transfer_service::execute_transfer(
        state.store.as_ref(),
        owner.account_id,
        request.to_account,
        request.amount,
    )
    .await
    .inspect_err(|err| {
        tracing::warn!(
            source = owner.account_id,
            destination = request.to_account,
            amount = request.amount,
            error = %err,
            "transfer refused"
        );
    })?;

    Ok(Json("transfer complete"))
}
