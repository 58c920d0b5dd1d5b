//! PostgreSQL store
//!
//! Atomic units are SERIALIZABLE transactions. Both account rows are also
//! read with `FOR UPDATE`, so two transfers touching the same account queue
//! on the row lock instead of both reading a stale balance.

use async_trait::async_trait;
use sqlx::{Postgres, Transaction};

use super::{BankStore, BankUnit, StoreError};
use crate::bank::models::{
    Account, AccountId, NewAccount, NewTransfer, TransferRecord, UserId,
};
use crate::db::Database;

const ACCOUNT_COLUMNS: &str = "id, user_id, owner, account_no, bank_name, balance";
const TRANSFER_COLUMNS: &str =
    "id, user_id, from_account_id, to_account_id, amount, currency, created_at";

/// SQLSTATE for serialization_failure
const SERIALIZATION_FAILURE: &str = "40001";
/// SQLSTATE for deadlock_detected
const DEADLOCK_DETECTED: &str = "40P01";

pub struct PgStore {
    db: Database,
}

impl PgStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

/// Translate driver errors into store errors, keeping the cases callers
/// need to tell apart.
fn classify(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return StoreError::DuplicateAccountNumber;
        }
        if let Some(code) = db_err.code() {
            if code == SERIALIZATION_FAILURE || code == DEADLOCK_DETECTED {
                return StoreError::Conflict(db_err.message().to_string());
            }
        }
    }
    StoreError::Database(e)
}

#[async_trait]
impl BankStore for PgStore {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.db.health_check().await.map_err(classify)
    }

    async fn create_account(&self, account: NewAccount) -> Result<Account, StoreError> {
        let sql = format!(
            "INSERT INTO bank_accounts (user_id, owner, account_no, bank_name, balance)
             VALUES ($1, $2, $3, $4, 0)
             RETURNING {ACCOUNT_COLUMNS}"
        );
        sqlx::query_as::<_, Account>(&sql)
            .bind(account.user_id)
            .bind(&account.owner)
            .bind(&account.account_no)
            .bind(&account.bank_name)
            .fetch_one(self.db.pool())
            .await
            .map_err(classify)
    }

    async fn list_accounts(&self, user_id: UserId) -> Result<Vec<Account>, StoreError> {
        let sql = format!(
            "SELECT {ACCOUNT_COLUMNS} FROM bank_accounts WHERE user_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, Account>(&sql)
            .bind(user_id)
            .fetch_all(self.db.pool())
            .await
            .map_err(classify)
    }

    async fn delete_account(
        &self,
        user_id: UserId,
        account_id: AccountId,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM bank_accounts WHERE user_id = $1 AND id = $2")
            .bind(user_id)
            .bind(account_id)
            .execute(self.db.pool())
            .await
            .map_err(classify)?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_transfers(&self, user_id: UserId) -> Result<Vec<TransferRecord>, StoreError> {
        let sql = format!(
            "SELECT {TRANSFER_COLUMNS} FROM transactions WHERE user_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, TransferRecord>(&sql)
            .bind(user_id)
            .fetch_all(self.db.pool())
            .await
            .map_err(classify)
    }

    async fn begin(&self) -> Result<Box<dyn BankUnit>, StoreError> {
        let mut tx = self.db.pool().begin().await.map_err(classify)?;
        // Must be the first statement of the transaction
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut *tx)
            .await
            .map_err(classify)?;
        Ok(Box::new(PgUnit { tx }))
    }
}

/// SERIALIZABLE transaction; rolled back by sqlx when dropped uncommitted
pub struct PgUnit {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl BankUnit for PgUnit {
    async fn find_owned_account(
        &mut self,
        account_id: AccountId,
        user_id: UserId,
    ) -> Result<Option<Account>, StoreError> {
        let sql = format!(
            "SELECT {ACCOUNT_COLUMNS} FROM bank_accounts
             WHERE id = $1 AND user_id = $2
             FOR UPDATE"
        );
        sqlx::query_as::<_, Account>(&sql)
            .bind(account_id)
            .bind(user_id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(classify)
    }

    async fn find_account_by_number(
        &mut self,
        account_no: &str,
        bank_name: &str,
    ) -> Result<Option<Account>, StoreError> {
        let sql = format!(
            "SELECT {ACCOUNT_COLUMNS} FROM bank_accounts
             WHERE account_no = $1 AND bank_name = $2
             FOR UPDATE"
        );
        sqlx::query_as::<_, Account>(&sql)
            .bind(account_no)
            .bind(bank_name)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(classify)
    }

    async fn update_account(&mut self, account: &Account) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE bank_accounts SET balance = $1 WHERE id = $2")
            .bind(account.balance)
            .bind(account.id)
            .execute(&mut *self.tx)
            .await
            .map_err(classify)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Missing(format!("account {}", account.id)));
        }
        Ok(())
    }

    async fn insert_transfer(
        &mut self,
        transfer: NewTransfer,
    ) -> Result<TransferRecord, StoreError> {
        let sql = format!(
            "INSERT INTO transactions (user_id, from_account_id, to_account_id, amount, currency)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {TRANSFER_COLUMNS}"
        );
        sqlx::query_as::<_, TransferRecord>(&sql)
            .bind(transfer.user_id)
            .bind(transfer.from_account_id)
            .bind(transfer.to_account_id)
            .bind(transfer.amount)
            .bind(&transfer.currency)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(classify)
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.commit().await.map_err(classify)
    }
}
