//! Session tokens binding a caller to one account number.
//!
//! Tokens are HS256 JWTs carrying exactly two claims:
//!
//! ```json
//! { "account_number": 482913, "expires_at": 1516239022 }
//! ```
//!
//! `expires_at` is a fixed value taken from configuration and is NOT checked on
//! validation. Every token stays valid until the signing secret changes.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::models::account::Account;

/// Claims carried by a session token.
///
/// Unknown or missing fields make the token invalid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Claims {
    pub account_number: i64,
    pub expires_at: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Bad signature, unexpected algorithm, or malformed token/claims.
    #[error("invalid token")]
    Invalid,

    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Issues and validates session tokens with a process-wide HMAC secret.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    expires_at: i64,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: &[u8], expires_at: i64) -> Self {
        // Only HS256 is accepted; any other `alg` header fails validation
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            expires_at,
        }
    }

    /// Mint a token for `account`. Same account and secret give the same token.
    pub fn issue(&self, account: &Account) -> Result<String, TokenError> {
        let claims = Claims {
            account_number: account.number,
            expires_at: self.expires_at,
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(TokenError::Signing)
    }

    /// Verify signature, algorithm and claim shape.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| {
                tracing::debug!(error = %err, "token rejected");
                TokenError::Invalid
            })
    }
}
