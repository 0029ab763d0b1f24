//! Transfer engine - moves funds between two accounts.
//!
//! # Check Order
//!
//! The first failing check decides the error:
//!
//! 1. `amount` is positive
//! 2. source account exists
//! 3. source balance covers `amount` (before the destination is loaded)
//! 4. destination account exists
//! 5. source and destination differ
//!
//! # Atomicity Guarantees
//!
//! Steps 2 onwards run inside one [`AccountTransaction`]. Both rows are locked
//! up front in a single ascending-id call and stay locked until commit, so
//! concurrent transfers touching the same account serialize (in either
//! direction) and both balance writes become visible together or not at all.
//! The checks then run on that locked snapshot in the order above.

use crate::{
    models::account::Account,
    store::{AccountStore, StoreError},
};

/// Reasons a transfer is refused.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("amount must be positive")]
    InvalidAmount,

    #[error("account {0} not found")]
    AccountNotFound(i64),

    #[error("insufficient balance")]
    InsufficientBalance,

    #[error("cannot do self transfer")]
    SelfTransferNotAllowed,

    /// Crediting the destination would overflow its balance.
    #[error("balance overflow")]
    BalanceOverflow,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Balances of both accounts after a committed transfer.
#[derive(Debug, Clone)]
pub struct TransferOutcome {
    pub source: Account,
    pub destination: Account,
    pub amount: i64,
}

/// Execute a transfer of `amount` from `source_id` to `destination_id`.
///
/// # Errors
///
/// - `InvalidAmount`: amount is zero or negative
/// - `AccountNotFound`: either account doesn't exist
/// - `InsufficientBalance`: source balance is below `amount`
/// - `SelfTransferNotAllowed`: both ids name the same account
/// - `BalanceOverflow`: destination balance would exceed `i64::MAX`
/// - `Store`: persistence failed; nothing was committed
pub async fn execute_transfer(
    store: &dyn AccountStore,
    source_id: i64,
    destination_id: i64,
    amount: i64,
) -> Result<TransferOutcome, TransferError> {
    validate_amount(amount)?;

    // Dropping `tx` on any early return rolls it back
    let mut tx = store.begin().await?;

    let locked = tx.lock_accounts(&[source_id, destination_id]).await?;

    let mut source = find(&locked, source_id)?;
    ensure_funds(&source, amount)?;

    let mut destination = find(&locked, destination_id)?;
    if destination.id == source.id {
        return Err(TransferError::SelfTransferNotAllowed);
    }

    apply(&mut source, &mut destination, amount)?;

    tx.set_balance(destination.id, destination.balance).await?;
    tx.set_balance(source.id, source.balance).await?;
    tx.commit().await?;

    tracing::info!(
        source = source.id,
        destination = destination.id,
        amount,
        "transfer committed"
    );

    Ok(TransferOutcome {
        source,
        destination,
        amount,
    })
}

fn find(locked: &[Account], id: i64) -> Result<Account, TransferError> {
    locked
        .iter()
        .find(|account| account.id == id)
        .cloned()
        .ok_or(TransferError::AccountNotFound(id))
}

fn validate_amount(amount: i64) -> Result<(), TransferError> {
    if amount <= 0 {
        return Err(TransferError::InvalidAmount);
    }
    Ok(())
}

fn ensure_funds(source: &Account, amount: i64) -> Result<(), TransferError> {
    if source.balance < amount {
        return Err(TransferError::InsufficientBalance);
    }
    Ok(())
}

/// Debit `source` and credit `destination` in memory.
///
/// Leaves both accounts untouched on error.
fn apply(source: &mut Account, destination: &mut Account, amount: i64) -> Result<(), TransferError> {
    let debited = source
        .balance
        .checked_sub(amount)
        .filter(|balance| *balance >= 0)
        .ok_or(TransferError::InsufficientBalance)?;
    let credited = destination
        .balance
        .checked_add(amount)
        .ok_or(TransferError::BalanceOverflow)?;

    source.balance = debited;
    destination.balance = credited;
    Ok(())
}
