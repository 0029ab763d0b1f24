//! In-process account store.
//!
//! Used when no `DATABASE_URL` is configured and by the test suites. All
//! accounts live behind one async mutex; an open [`AccountTransaction`] holds
//! that mutex until it commits or is dropped, which serializes transfers.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{AccountStore, AccountTransaction, StoreError};
use crate::models::account::{Account, NewAccount};

#[derive(Debug, Default)]
struct Accounts {
    next_id: i64,
    by_id: BTreeMap<i64, Account>,
}

/// Account store kept entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Accounts>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn create_account(&self, account: NewAccount) -> Result<Account, StoreError> {
        let mut accounts = self.inner.lock().await;

        if accounts.by_id.values().any(|a| a.number == account.number) {
            return Err(StoreError::DuplicateNumber(account.number));
        }

        accounts.next_id += 1;
        let created = Account {
            id: accounts.next_id,
            first_name: account.first_name,
            last_name: account.last_name,
            number: account.number,
            balance: account.balance,
            password_hash: account.password_hash,
            created_at: account.created_at,
        };
        accounts.by_id.insert(created.id, created.clone());

        Ok(created)
    }

    async fn get_account_by_id(&self, id: i64) -> Result<Account, StoreError> {
        self.inner
            .lock()
            .await
            .by_id
            .get(&id)
            .cloned()
            .ok_or(StoreError::AccountNotFound(id))
    }

    async fn get_account_by_number(&self, number: i64) -> Result<Account, StoreError> {
        self.inner
            .lock()
            .await
            .by_id
            .values()
            .find(|a| a.number == number)
            .cloned()
            .ok_or(StoreError::NumberNotFound(number))
    }

    async fn update_account(&self, account: &Account) -> Result<(), StoreError> {
        let mut accounts = self.inner.lock().await;
        let stored = accounts
            .by_id
            .get_mut(&account.id)
            .ok_or(StoreError::AccountNotFound(account.id))?;
        stored.balance = account.balance;
        Ok(())
    }

    async fn delete_account(&self, id: i64) -> Result<(), StoreError> {
        self.inner
            .lock()
            .await
            .by_id
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::AccountNotFound(id))
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError> {
        Ok(self.inner.lock().await.by_id.values().cloned().collect())
    }

    async fn begin(&self) -> Result<Box<dyn AccountTransaction>, StoreError> {
        let guard = self.inner.clone().lock_owned().await;
        Ok(Box::new(MemoryTransaction {
            guard,
            staged: HashMap::new(),
        }))
    }
}

/// Exclusive view of the store with balance writes staged until commit.
struct MemoryTransaction {
    guard: OwnedMutexGuard<Accounts>,
    staged: HashMap<i64, i64>,
}

#[async_trait]
impl AccountTransaction for MemoryTransaction {
    async fn lock_accounts(&mut self, ids: &[i64]) -> Result<Vec<Account>, StoreError> {
        // by_id iterates in ascending id order
        Ok(self
            .guard
            .by_id
            .values()
            .filter(|account| ids.contains(&account.id))
            .cloned()
            .map(|mut account| {
                if let Some(balance) = self.staged.get(&account.id) {
                    account.balance = *balance;
                }
                account
            })
            .collect())
    }

    async fn set_balance(&mut self, id: i64, balance: i64) -> Result<(), StoreError> {
        if !self.guard.by_id.contains_key(&id) {
            return Err(StoreError::AccountNotFound(id));
        }
        self.staged.insert(id, balance);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let MemoryTransaction { mut guard, staged } = *self;
        for (id, balance) in staged {
            if let Some(account) = guard.by_id.get_mut(&id) {
                account.balance = balance;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_account(number: i64) -> NewAccount {
        let mut account = NewAccount::new("Ada".into(), "Lovelace".into(), "hash".into());
        account.number = number;
        account
    }

    #[tokio::test]
    async fn create_assigns_increasing_ids() {
        let store = MemoryStore::new();
        let a = store.create_account(new_account(1)).await.unwrap();
        let b = store.create_account(new_account(2)).await.unwrap();
        assert!(b.id > a.id);
        assert_eq!(store.list_accounts().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn duplicate_number_is_rejected() {
        let store = MemoryStore::new();
        store.create_account(new_account(42)).await.unwrap();
        let err = store.create_account(new_account(42)).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateNumber(42)));
    }

    #[tokio::test]
    async fn lookups_report_not_found() {
        let store = MemoryStore::new();
        let created = store.create_account(new_account(9)).await.unwrap();

        assert_eq!(store.get_account_by_number(9).await.unwrap(), created);
        assert!(matches!(
            store.get_account_by_id(999).await,
            Err(StoreError::AccountNotFound(999))
        ));
        assert!(matches!(
            store.get_account_by_number(10).await,
            Err(StoreError::NumberNotFound(10))
        ));
    }

    #[tokio::test]
    async fn delete_removes_account() {
        let store = MemoryStore::new();
        let created = store.create_account(new_account(3)).await.unwrap();

        store.delete_account(created.id).await.unwrap();
        assert!(store.get_account_by_id(created.id).await.is_err());
        assert!(store.delete_account(created.id).await.is_err());
    }

    #[tokio::test]
    async fn dropped_transaction_discards_staged_writes() {
        let store = MemoryStore::new();
        let created = store.create_account(new_account(5)).await.unwrap();

        {
            let mut tx = store.begin().await.unwrap();
            tx.set_balance(created.id, 900).await.unwrap();
            let seen = tx.lock_accounts(&[created.id]).await.unwrap();
            assert_eq!(seen[0].balance, 900);
        }

        assert_eq!(store.get_account_by_id(created.id).await.unwrap().balance, 0);
    }

    #[tokio::test]
    async fn locked_accounts_come_back_in_id_order() {
        let store = MemoryStore::new();
        let a = store.create_account(new_account(1)).await.unwrap();
        let b = store.create_account(new_account(2)).await.unwrap();

        let mut tx = store.begin().await.unwrap();
        let locked = tx.lock_accounts(&[b.id, 404, a.id]).await.unwrap();

        let ids: Vec<i64> = locked.iter().map(|account| account.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);
    }

    #[tokio::test]
    async fn committed_transaction_applies_writes() {
        let store = MemoryStore::new();
        let created = store.create_account(new_account(5)).await.unwrap();

        let mut tx = store.begin().await.unwrap();
        tx.set_balance(created.id, 900).await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(store.get_account_by_id(created.id).await.unwrap().balance, 900);
    }
}
