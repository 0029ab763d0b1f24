//! PostgreSQL-backed account store.

use async_trait::async_trait;
use sqlx::{Postgres, Transaction};

use super::{AccountStore, AccountTransaction, StoreError};
use crate::{
    db::DbPool,
    models::account::{Account, NewAccount},
};

const ACCOUNT_COLUMNS: &str =
    "id, first_name, last_name, number, balance, password_hash, created_at";

/// Account store over a PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: DbPool,
}

impl PostgresStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PostgresStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn create_account(&self, account: NewAccount) -> Result<Account, StoreError> {
        let result = sqlx::query_as::<_, Account>(&format!(
            r#"
            INSERT INTO accounts (first_name, last_name, number, balance, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(account.number)
        .bind(account.balance)
        .bind(&account.password_hash)
        .bind(account.created_at)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(created) => Ok(created),
            // The only unique column besides the primary key is `number`
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(StoreError::DuplicateNumber(account.number))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn get_account_by_id(&self, id: i64) -> Result<Account, StoreError> {
        sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::AccountNotFound(id))
    }

    async fn get_account_by_number(&self, number: i64) -> Result<Account, StoreError> {
        sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE number = $1"
        ))
        .bind(number)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NumberNotFound(number))
    }

    async fn update_account(&self, account: &Account) -> Result<(), StoreError> {
        let updated = sqlx::query("UPDATE accounts SET balance = $1 WHERE id = $2")
            .bind(account.balance)
            .bind(account.id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if updated == 0 {
            return Err(StoreError::AccountNotFound(account.id));
        }
        Ok(())
    }

    async fn delete_account(&self, id: i64) -> Result<(), StoreError> {
        let deleted = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if deleted == 0 {
            return Err(StoreError::AccountNotFound(id));
        }
        Ok(())
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError> {
        let accounts = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(accounts)
    }

    async fn begin(&self) -> Result<Box<dyn AccountTransaction>, StoreError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgAccountTransaction { tx }))
    }
}

/// Database transaction holding `FOR UPDATE` row locks.
///
/// sqlx rolls the transaction back when it is dropped uncommitted.
struct PgAccountTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl AccountTransaction for PgAccountTransaction {
    async fn lock_accounts(&mut self, ids: &[i64]) -> Result<Vec<Account>, StoreError> {
        // FOR UPDATE blocks concurrent transfers on these rows until we commit;
        // ORDER BY id fixes the lock order across transactions
        let accounts = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ANY($1) ORDER BY id FOR UPDATE"
        ))
        .bind(ids)
        .fetch_all(&mut *self.tx)
        .await?;

        Ok(accounts)
    }

    async fn set_balance(&mut self, id: i64, balance: i64) -> Result<(), StoreError> {
        let updated = sqlx::query("UPDATE accounts SET balance = $1 WHERE id = $2")
            .bind(balance)
            .bind(id)
            .execute(&mut *self.tx)
            .await?
            .rows_affected();

        if updated == 0 {
            return Err(StoreError::AccountNotFound(id));
        }
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.commit().await?;
        Ok(())
    }
}
