//! Persistence layer
//!
//! The service code only sees the [`BankStore`] and [`BankUnit`] traits. A
//! store is built once at startup and shared behind an `Arc`.
//!
//! # Atomic units
//!
//! [`BankStore::begin`] opens a unit. Reads and writes made through the unit
//! are isolated from every other unit; they become visible only after
//! [`BankUnit::commit`]. Dropping a unit without committing rolls it back.
//!
//! - [`PgStore`]: SERIALIZABLE PostgreSQL transaction
//! - [`MemoryStore`]: exclusive lock held for the lifetime of the unit

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use thiserror::Error;

use super::models::{
    Account, AccountId, NewAccount, NewTransfer, TransferRecord, UserId,
};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Account number already exists")]
    DuplicateAccountNumber,

    /// A concurrent unit touched the same rows; this one lost
    #[error("Conflicting concurrent transaction: {0}")]
    Conflict(String),

    #[error("Record not found: {0}")]
    Missing(String),

    #[error("Injected failure: {0}")]
    Injected(&'static str),
}

/// Record storage with create/find/update/delete and atomic units
#[async_trait]
pub trait BankStore: Send + Sync {
    /// Get store name for logging
    fn name(&self) -> &'static str;

    /// Liveness probe
    async fn ping(&self) -> Result<(), StoreError>;

    /// Insert a new account with a zero balance
    async fn create_account(&self, account: NewAccount) -> Result<Account, StoreError>;

    /// All accounts owned by `user_id`, ordered by id
    async fn list_accounts(&self, user_id: UserId) -> Result<Vec<Account>, StoreError>;

    /// Delete an account only if `user_id` owns it. Returns whether a row was removed.
    async fn delete_account(
        &self,
        user_id: UserId,
        account_id: AccountId,
    ) -> Result<bool, StoreError>;

    /// All transfer records created by `user_id`, ordered by id
    async fn list_transfers(&self, user_id: UserId) -> Result<Vec<TransferRecord>, StoreError>;

    /// Open an atomic unit
    async fn begin(&self) -> Result<Box<dyn BankUnit>, StoreError>;
}

/// An open atomic unit. Nothing is visible to others until `commit`.
#[async_trait]
pub trait BankUnit: Send {
    /// Find an account by id, restricted to accounts owned by `user_id`
    async fn find_owned_account(
        &mut self,
        account_id: AccountId,
        user_id: UserId,
    ) -> Result<Option<Account>, StoreError>;

    /// Find an account by its number and bank, regardless of owner
    async fn find_account_by_number(
        &mut self,
        account_no: &str,
        bank_name: &str,
    ) -> Result<Option<Account>, StoreError>;

    /// Persist the balance of an account loaded through this unit
    async fn update_account(&mut self, account: &Account) -> Result<(), StoreError>;

    /// Insert a transfer record
    async fn insert_transfer(&mut self, transfer: NewTransfer)
    -> Result<TransferRecord, StoreError>;

    /// Make every change of this unit visible, atomically
    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
}
