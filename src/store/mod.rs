//! Account persistence.
//!
//! The rest of the service only talks to the [`AccountStore`] trait, so the
//! same handlers run against PostgreSQL in production and the in-memory store
//! in development and tests.
//!
//! # Atomicity
//!
//! Fund transfers never go through [`AccountStore::update_account`]. They open an
//! [`AccountTransaction`] with [`AccountStore::begin`], lock both rows in one
//! call, stage both balance writes and commit once. Dropping a transaction without calling
//! [`AccountTransaction::commit`] discards every staged write.

use async_trait::async_trait;

use crate::models::account::{Account, NewAccount};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// Errors returned by account stores.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No account with the given id exists.
    #[error("account {0} not found")]
    AccountNotFound(i64),

    /// No account with the given account number exists.
    #[error("account with number {0} not found")]
    NumberNotFound(i64),

    /// The account number is already taken by another account.
    #[error("account number {0} already exists")]
    DuplicateNumber(i64),

    /// Database operation failed (e.g., connection error, query error).
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// CRUD access to accounts plus a unit of work for balance movements.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Check that the backing storage is reachable.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Insert an account and return it with its assigned id.
    ///
    /// Fails with [`StoreError::DuplicateNumber`] when `account.number` is taken.
    async fn create_account(&self, account: NewAccount) -> Result<Account, StoreError>;

    async fn get_account_by_id(&self, id: i64) -> Result<Account, StoreError>;

    async fn get_account_by_number(&self, number: i64) -> Result<Account, StoreError>;

    /// Write back the balance of an existing account.
    async fn update_account(&self, account: &Account) -> Result<(), StoreError>;

    async fn delete_account(&self, id: i64) -> Result<(), StoreError>;

    /// All accounts, oldest first.
    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError>;

    /// Start a unit of work.
    async fn begin(&self) -> Result<Box<dyn AccountTransaction>, StoreError>;
}

/// A single atomic scope over account rows.
///
/// Rows returned by [`lock_accounts`](AccountTransaction::lock_accounts) stay
/// locked against other transactions until commit or drop.
#[async_trait]
pub trait AccountTransaction: Send {
    /// Load and lock every existing account among `ids`.
    ///
    /// Rows are locked in ascending id order whatever the order of `ids`, so
    /// two transactions over the same accounts queue instead of deadlocking.
    /// Missing ids are simply absent from the result.
    async fn lock_accounts(&mut self, ids: &[i64]) -> Result<Vec<Account>, StoreError>;

    /// Stage a new balance for an account locked in this transaction.
    async fn set_balance(&mut self, id: i64, balance: i64) -> Result<(), StoreError>;

    /// Make every staged write visible at once.
    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
}
