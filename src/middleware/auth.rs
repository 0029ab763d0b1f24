//! Account ownership guard.
//!
//! This middleware protects every route that addresses one account by id
//! (`/accounts/{id}`, `/accounts/transfer/{id}`). For each request it:
//! 1. Extracts the session token from the `x-jwt-token` header
//! 2. Validates the token's signature and claims
//! 3. Parses the account id from the path and loads that account
//! 4. Compares the account's number with the number bound into the token
//! 5. Injects the owner context and calls the handler, or rejects with HTTP 403

use axum::{
    extract::{Path, Request, State, rejection::PathRejection},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{error::AppError, state::AppState};

/// Header carrying the session token.
pub const TOKEN_HEADER: &str = "x-jwt-token";

/// Ownership context attached to admitted requests.
///
/// Handlers extract it with `Extension<AccountOwner>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountOwner {
    /// Id of the account named in the path, already checked against the token
    pub account_id: i64,
}

/// Ownership guard middleware function.
///
/// # Headers
///
/// ```text
/// x-jwt-token: eyJhbGciOiJIUzI1NiJ9...
/// ```
///
/// # Returns
///
/// - The handler's response if the token's account number matches the account in the path
/// - HTTP 403 `{"error":"permission denied"}` otherwise. The response is the same whichever
///   check failed; the reason is only logged at debug level.
pub async fn ownership_guard(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    mut request: Request,
    next: Next,
) -> Response {
    let checked = check_ownership(&state, request.headers(), path).await;
    match checked {
        Ok(owner) => {
            request.extensions_mut().insert(owner);
            next.run(request).await
        }
        Err(reason) => {
            tracing::debug!(reason, uri = %request.uri(), "permission denied");
            AppError::PermissionDenied.into_response()
        }
    }
}

/// Runs the checks in order and stops at the first failure.
async fn check_ownership(
    state: &AppState,
    headers: &HeaderMap,
    path: Result<Path<String>, PathRejection>,
) -> Result<AccountOwner, &'static str> {
    let token = headers
        .get(TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or("missing token header")?;

    let claims = state
        .tokens
        .validate(token)
        .map_err(|_| "invalid token")?;

    let Path(raw_id) = path.map_err(|_| "missing account id")?;
    let account_id: i64 = raw_id.parse().map_err(|_| "unparsable account id")?;

    let account = state
        .store
        .get_account_by_id(account_id)
        .await
        .map_err(|_| "account lookup failed")?;

    if account.number != claims.account_number {
        return Err("token bound to another account");
    }

    Ok(AccountOwner {
        account_id: account.id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::token::TokenService,
        models::account::NewAccount,
        store::{AccountStore, MemoryStore},
    };
    use axum::http::HeaderValue;
    use std::sync::Arc;

    async fn state_with_account(number: i64) -> (AppState, i64, String) {
        let store = MemoryStore::new();
        let mut new = NewAccount::new("Ada".into(), "Lovelace".into(), "hash".into());
        new.number = number;
        let account = store.create_account(new).await.unwrap();

        let tokens = TokenService::new(b"guard-secret", 1);
        let token = tokens.issue(&account).unwrap();
        (AppState::new(Arc::new(store), tokens), account.id, token)
    }

    fn headers_with(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(TOKEN_HEADER, HeaderValue::from_str(token).unwrap());
        headers
    }

    #[tokio::test]
    async fn owner_carries_the_path_account_id() {
        let (state, id, token) = state_with_account(7).await;

        let owner = check_ownership(&state, &headers_with(&token), Ok(Path(id.to_string())))
            .await
            .unwrap();

        assert_eq!(owner, AccountOwner { account_id: id });
    }

    #[tokio::test]
    async fn checks_fail_in_order() {
        let (state, id, token) = state_with_account(7).await;

        let missing = check_ownership(&state, &HeaderMap::new(), Ok(Path(id.to_string()))).await;
        assert_eq!(missing, Err("missing token header"));

        let forged = check_ownership(&state, &headers_with("x.y.z"), Ok(Path(id.to_string()))).await;
        assert_eq!(forged, Err("invalid token"));

        let unparsable = check_ownership(&state, &headers_with(&token), Ok(Path("abc".into()))).await;
        assert_eq!(unparsable, Err("unparsable account id"));

        let unknown = check_ownership(&state, &headers_with(&token), Ok(Path("999".into()))).await;
        assert_eq!(unknown, Err("account lookup failed"));
    }
}
