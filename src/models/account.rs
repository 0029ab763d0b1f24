//! Account data models and API request/response types.
//!
//! This module defines:
//! - `Account`: Stored account record, including its password hash
//! - `NewAccount`: Account about to be inserted (no id yet)
//! - `CreateAccountRequest` / `LoginRequest`: Request bodies
//! - `AccountResponse`: Response body returned to clients

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account numbers are drawn from `0..ACCOUNT_NUMBER_RANGE`.
pub const ACCOUNT_NUMBER_RANGE: i64 = 1_000_000;

/// Represents an account record from the store.
///
/// # Database Table
///
/// Maps to the `accounts` table. Each account has:
/// - A store-assigned `id` used in URLs
/// - A randomly assigned `number` used as the owner's identity inside session tokens
///
/// # Balance Storage
///
/// Balances are stored as `i64` minor units (cents) to avoid floating-point precision issues.
/// Only the transfer engine or an explicit update changes it, and it must stay >= 0
/// after every committed transfer.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Account {
    /// Store-assigned identifier, immutable
    pub id: i64,

    pub first_name: String,

    pub last_name: String,

    /// Public account number embedded in session tokens
    pub number: i64,

    /// Current balance in minor units
    pub balance: i64,

    /// PHC-encoded password hash. Never serialized to clients.
    pub password_hash: String,

    /// Timestamp when account was created
    pub created_at: DateTime<Utc>,
}

/// An account that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub number: i64,
    pub balance: i64,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl NewAccount {
    /// Build a zero-balance account with a freshly drawn account number.
    pub fn new(first_name: String, last_name: String, password_hash: String) -> Self {
        Self {
            first_name,
            last_name,
            number: random_account_number(),
            balance: 0,
            password_hash,
            created_at: Utc::now(),
        }
    }

    /// Replace the account number, used after a uniqueness collision.
    pub fn renumber(&mut self) {
        self.number = random_account_number();
    }
}

fn random_account_number() -> i64 {
    rand::random_range(0..ACCOUNT_NUMBER_RANGE)
}

/// Request body for creating a new account.
///
/// # JSON Example
///
/// ```json
/// {
///   "first_name": "Ada",
///   "last_name": "Lovelace",
///   "password": "hunter2"
/// }
/// ```
///
/// `firstName` / `lastName` are accepted as well.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    #[serde(alias = "firstName")]
    pub first_name: String,

    #[serde(alias = "lastName")]
    pub last_name: String,

    pub password: String,
}

/// Request body for `POST /login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Account number (not the id)
    pub number: i64,

    pub password: String,
}

/// Response body for account endpoints.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": 1,
///   "first_name": "Ada",
///   "last_name": "Lovelace",
///   "number": 482913,
///   "balance": 500,
///   "created_at": "2025-12-20T10:00:00Z"
/// }
/// ```
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub number: i64,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
}

/// Convert a stored Account to the client-facing AccountResponse.
///
/// This transformation drops the password hash.
impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            first_name: account.first_name,
            last_name: account.last_name,
            number: account.number,
            balance: account.balance,
            created_at: account.created_at,
        }
    }
}
