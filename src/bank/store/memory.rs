//! In-process store
//!
//! State lives behind a single async mutex. A unit takes the owned guard when
//! it begins and works on a copy of the state; `commit` swaps the copy in.
//! Units are therefore fully serialized, which is stronger than SERIALIZABLE.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{BankStore, BankUnit, StoreError};
use crate::bank::models::{
    Account, AccountId, NewAccount, NewTransfer, TransferId, TransferRecord, UserId,
};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    accounts: BTreeMap<AccountId, Account>,
    transfers: BTreeMap<TransferId, TransferRecord>,
    last_account_id: AccountId,
    last_transfer_id: TransferId,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
    /// Configured behavior: make the next transfer insert fail
    fail_next_transfer_insert: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an account balance directly, outside any transfer.
    ///
    /// Stands in for the external funding path (deposits are not part of
    /// this service).
    pub async fn set_balance(&self, account_id: AccountId, balance: Decimal) -> bool {
        let mut state = self.state.lock().await;
        match state.accounts.get_mut(&account_id) {
            Some(account) => {
                account.balance = balance;
                true
            }
            None => false,
        }
    }

    /// Look up any account by id, ignoring ownership
    pub async fn account(&self, account_id: AccountId) -> Option<Account> {
        self.state.lock().await.accounts.get(&account_id).cloned()
    }

    /// Number of transfer records across all users
    pub async fn transfer_count(&self) -> usize {
        self.state.lock().await.transfers.len()
    }

    pub fn set_fail_next_transfer_insert(&self, fail: bool) {
        self.fail_next_transfer_insert.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl BankStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn create_account(&self, account: NewAccount) -> Result<Account, StoreError> {
        let mut state = self.state.lock().await;
        if state
            .accounts
            .values()
            .any(|a| a.account_no == account.account_no)
        {
            return Err(StoreError::DuplicateAccountNumber);
        }

        state.last_account_id += 1;
        let created = Account {
            id: state.last_account_id,
            user_id: account.user_id,
            owner: account.owner,
            account_no: account.account_no,
            bank_name: account.bank_name,
            balance: Decimal::ZERO,
        };
        state.accounts.insert(created.id, created.clone());
        Ok(created)
    }

    async fn list_accounts(&self, user_id: UserId) -> Result<Vec<Account>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .accounts
            .values()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn delete_account(
        &self,
        user_id: UserId,
        account_id: AccountId,
    ) -> Result<bool, StoreError> {
        let mut state = self.state.lock().await;
        let owned = state
            .accounts
            .get(&account_id)
            .is_some_and(|a| a.user_id == user_id);
        if owned {
            state.accounts.remove(&account_id);
        }
        Ok(owned)
    }

    async fn list_transfers(&self, user_id: UserId) -> Result<Vec<TransferRecord>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .transfers
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn begin(&self) -> Result<Box<dyn BankUnit>, StoreError> {
        let guard = self.state.clone().lock_owned().await;
        let working = MemoryState::clone(&guard);
        Ok(Box::new(MemoryUnit {
            guard,
            working,
            fail_insert: self.fail_next_transfer_insert.swap(false, Ordering::SeqCst),
        }))
    }
}

pub struct MemoryUnit {
    guard: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
    fail_insert: bool,
}

#[async_trait]
impl BankUnit for MemoryUnit {
    async fn find_owned_account(
        &mut self,
        account_id: AccountId,
        user_id: UserId,
    ) -> Result<Option<Account>, StoreError> {
        Ok(self
            .working
            .accounts
            .get(&account_id)
            .filter(|a| a.user_id == user_id)
            .cloned())
    }

    async fn find_account_by_number(
        &mut self,
        account_no: &str,
        bank_name: &str,
    ) -> Result<Option<Account>, StoreError> {
        Ok(self
            .working
            .accounts
            .values()
            .find(|a| a.account_no == account_no && a.bank_name == bank_name)
            .cloned())
    }

    async fn update_account(&mut self, account: &Account) -> Result<(), StoreError> {
        let stored = self
            .working
            .accounts
            .get_mut(&account.id)
            .ok_or_else(|| StoreError::Missing(format!("account {}", account.id)))?;
        stored.balance = account.balance;
        Ok(())
    }

    async fn insert_transfer(
        &mut self,
        transfer: NewTransfer,
    ) -> Result<TransferRecord, StoreError> {
        if self.fail_insert {
            return Err(StoreError::Injected("transfer insert"));
        }

        self.working.last_transfer_id += 1;
        let record = TransferRecord {
            id: self.working.last_transfer_id,
            user_id: transfer.user_id,
            from_account_id: transfer.from_account_id,
            to_account_id: transfer.to_account_id,
            amount: transfer.amount,
            currency: transfer.currency,
            created_at: chrono::Utc::now(),
        };
        self.working.transfers.insert(record.id, record.clone());
        Ok(record)
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let MemoryUnit {
            mut guard, working, ..
        } = *self;
        *guard = working;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_account(user_id: UserId, account_no: &str) -> NewAccount {
        NewAccount {
            user_id,
            owner: format!("owner-{}", user_id),
            account_no: account_no.to_string(),
            bank_name: "Mem Bank".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_ids_and_zero_balance() {
        let store = MemoryStore::new();
        let a = store.create_account(new_account(1, "A-1")).await.unwrap();
        let b = store.create_account(new_account(1, "A-2")).await.unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(a.balance, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_duplicate_account_number_rejected() {
        let store = MemoryStore::new();
        store.create_account(new_account(1, "DUP")).await.unwrap();
        let err = store.create_account(new_account(2, "DUP")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateAccountNumber));
    }

    #[tokio::test]
    async fn test_delete_requires_ownership() {
        let store = MemoryStore::new();
        let a = store.create_account(new_account(1, "DEL")).await.unwrap();

        assert!(!store.delete_account(2, a.id).await.unwrap());
        assert!(store.account(a.id).await.is_some());

        assert!(store.delete_account(1, a.id).await.unwrap());
        assert!(store.account(a.id).await.is_none());
    }

    #[tokio::test]
    async fn test_unit_changes_invisible_until_commit() {
        let store = MemoryStore::new();
        let a = store.create_account(new_account(1, "U-1")).await.unwrap();

        let mut unit = store.begin().await.unwrap();
        let mut loaded = unit.find_owned_account(a.id, 1).await.unwrap().unwrap();
        loaded.balance = Decimal::from(5);
        unit.update_account(&loaded).await.unwrap();
        drop(unit);

        assert_eq!(store.account(a.id).await.unwrap().balance, Decimal::ZERO);

        let mut unit = store.begin().await.unwrap();
        unit.update_account(&loaded).await.unwrap();
        unit.commit().await.unwrap();

        assert_eq!(store.account(a.id).await.unwrap().balance, Decimal::from(5));
    }

    #[tokio::test]
    async fn test_find_owned_account_filters_by_user() {
        let store = MemoryStore::new();
        let a = store.create_account(new_account(1, "O-1")).await.unwrap();

        let mut unit = store.begin().await.unwrap();
        assert!(unit.find_owned_account(a.id, 2).await.unwrap().is_none());
        assert!(unit.find_owned_account(a.id, 1).await.unwrap().is_some());
        assert!(
            unit.find_account_by_number("O-1", "Mem Bank")
                .await
                .unwrap()
                .is_some()
        );
        assert!(
            unit.find_account_by_number("O-1", "Other Bank")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_injected_failure_applies_once() {
        let store = MemoryStore::new();
        store.set_fail_next_transfer_insert(true);

        let transfer = NewTransfer {
            user_id: 1,
            from_account_id: 1,
            to_account_id: 2,
            amount: Decimal::ONE,
            currency: "USD".to_string(),
        };

        let mut unit = store.begin().await.unwrap();
        assert!(unit.insert_transfer(transfer.clone()).await.is_err());
        drop(unit);

        let mut unit = store.begin().await.unwrap();
        assert!(unit.insert_transfer(transfer).await.is_ok());
    }
}
