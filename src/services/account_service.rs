//! Account opening and owner authentication.

use crate::{
    auth::password::{self, HashError},
    error::AppError,
    models::account::{Account, CreateAccountRequest, NewAccount},
    store::{AccountStore, StoreError},
};

/// How many random account numbers to try before giving up on a collision.
pub const MAX_NUMBER_ATTEMPTS: usize = 5;

/// Hash the password and insert a new zero-balance account.
///
/// A collision on the randomly drawn account number is retried with a fresh
/// number up to [`MAX_NUMBER_ATTEMPTS`] times.
pub async fn open_account(
    store: &dyn AccountStore,
    request: CreateAccountRequest,
) -> Result<Account, AppError> {
    let CreateAccountRequest {
        first_name,
        last_name,
        password,
    } = request;

    // Argon2 is CPU bound; keep it off the async workers
    let password_hash = tokio::task::spawn_blocking(move || password::hash_password(&password))
        .await
        .map_err(|_| HashError)??;

    let mut account = NewAccount::new(first_name, last_name, password_hash);
    let mut attempt = 1;
    loop {
        match store.create_account(account.clone()).await {
            Err(StoreError::DuplicateNumber(number)) if attempt < MAX_NUMBER_ATTEMPTS => {
                tracing::debug!(number, attempt, "account number taken, drawing another");
                attempt += 1;
                account.renumber();
            }
            result => {
                let created = result?;
                tracing::info!(id = created.id, number = created.number, "account opened");
                return Ok(created);
            }
        }
    }
}

/// Look up an account by number and check its password.
///
/// # Errors
///
/// - `Store`: no account has this number (reported like any other lookup failure)
/// - `PermissionDenied`: the password does not match
pub async fn authenticate(
    store: &dyn AccountStore,
    number: i64,
    password: String,
) -> Result<Account, AppError> {
    let account = store.get_account_by_number(number).await?;

    let stored_hash = account.password_hash.clone();
    let verified =
        tokio::task::spawn_blocking(move || password::verify_password(&stored_hash, &password))
            .await
            .unwrap_or(false);

    if !verified {
        tracing::debug!(number, "login rejected");
        return Err(AppError::PermissionDenied);
    }

    Ok(account)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    fn request(password: &str) -> CreateAccountRequest {
        CreateAccountRequest {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn opened_account_stores_hash_not_password() {
        let store = MemoryStore::new();
        let account = open_account(&store, request("pw-1")).await.unwrap();

        assert_eq!(account.balance, 0);
        assert_ne!(account.password_hash, "pw-1");
        assert!(password::verify_password(&account.password_hash, "pw-1"));
    }

    #[tokio::test]
    async fn authenticate_accepts_correct_password() {
        let store = MemoryStore::new();
        let account = open_account(&store, request("pw-1")).await.unwrap();

        let authed = authenticate(&store, account.number, "pw-1".into())
            .await
            .unwrap();
        assert_eq!(authed.id, account.id);
    }

    #[tokio::test]
    async fn authenticate_rejects_wrong_password() {
        let store = MemoryStore::new();
        let account = open_account(&store, request("pw-1")).await.unwrap();

        let err = authenticate(&store, account.number, "nope".into())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::PermissionDenied));
    }

    #[tokio::test]
    async fn authenticate_reports_unknown_number() {
        let store = MemoryStore::new();
        let err = authenticate(&store, 123, "pw".into()).await.unwrap_err();
        assert!(matches!(err, AppError::Store(StoreError::NumberNotFound(123))));
    }

    /// Rejects the first `collisions` inserts as duplicates.
    struct CollidingStore {
        inner: MemoryStore,
        collisions: usize,
        attempts: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl AccountStore for CollidingStore {
        async fn ping(&self) -> Result<(), StoreError> {
            Ok(())
        }
        async fn create_account(&self, account: NewAccount) -> Result<Account, StoreError> {
            let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
            if attempt < self.collisions {
                return Err(StoreError::DuplicateNumber(account.number));
            }
            self.inner.create_account(account).await
        }
        async fn get_account_by_id(&self, id: i64) -> Result<Account, StoreError> {
            self.inner.get_account_by_id(id).await
        }
        async fn get_account_by_number(&self, number: i64) -> Result<Account, StoreError> {
            self.inner.get_account_by_number(number).await
        }
        async fn update_account(&self, account: &Account) -> Result<(), StoreError> {
            self.inner.update_account(account).await
        }
        async fn delete_account(&self, id: i64) -> Result<(), StoreError> {
            self.inner.delete_account(id).await
        }
        async fn list_accounts(&self) -> Result<Vec<Account>, StoreError> {
            self.inner.list_accounts().await
        }
        async fn begin(
            &self,
        ) -> Result<Box<dyn crate::store::AccountTransaction>, StoreError> {
            self.inner.begin().await
        }
    }

    #[tokio::test]
    async fn number_collisions_are_retried() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let store = CollidingStore {
            inner: MemoryStore::new(),
            collisions: 2,
            attempts: attempts.clone(),
        };

        open_account(&store, request("pw")).await.unwrap();
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn persistent_collisions_give_up() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let store = CollidingStore {
            inner: MemoryStore::new(),
            collisions: usize::MAX,
            attempts: attempts.clone(),
        };

        let err = open_account(&store, request("pw")).await.unwrap_err();
        assert!(matches!(err, AppError::Store(StoreError::DuplicateNumber(_))));
        assert_eq!(attempts.load(Ordering::SeqCst), MAX_NUMBER_ATTEMPTS);
    }
}
