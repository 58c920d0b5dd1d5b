//! Account CRUD and transfer history.

use std::sync::Arc;

use super::error::BankError;
use super::models::{Account, AccountId, NewAccount, TransferRecord, UserId};
use super::store::BankStore;

#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn BankStore>,
}

impl AccountService {
    pub fn new(store: Arc<dyn BankStore>) -> Self {
        Self { store }
    }

    /// Open an account. Whatever the caller sent, the balance starts at zero.
    pub async fn create(
        &self,
        user_id: UserId,
        owner: &str,
        account_no: &str,
        bank_name: &str,
    ) -> Result<Account, BankError> {
        let owner = required("owner", owner)?;
        let account_no = required("account_no", account_no)?;
        let bank_name = required("bank_name", bank_name)?;

        let account = self
            .store
            .create_account(NewAccount {
                user_id,
                owner,
                account_no,
                bank_name,
            })
            .await?;

        tracing::info!(
            account_id = account.id,
            user_id,
            account_no = %account.account_no,
            "Account created"
        );
        Ok(account)
    }

    pub async fn list(&self, user_id: UserId) -> Result<Vec<Account>, BankError> {
        Ok(self.store.list_accounts(user_id).await?)
    }

    /// Delete an account owned by `user_id`. Missing or foreign accounts are
    /// left alone and reported as `false`.
    pub async fn delete(&self, user_id: UserId, account_id: AccountId) -> Result<bool, BankError> {
        let deleted = self.store.delete_account(user_id, account_id).await?;
        if deleted {
            tracing::info!(account_id, user_id, "Account deleted");
        } else {
            tracing::debug!(account_id, user_id, "Delete matched no owned account");
        }
        Ok(deleted)
    }

    pub async fn transfers(&self, user_id: UserId) -> Result<Vec<TransferRecord>, BankError> {
        Ok(self.store.list_transfers(user_id).await?)
    }
}

fn required(field: &str, value: &str) -> Result<String, BankError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BankError::validation(format!("{} must not be empty", field)));
    }
    Ok(trimmed.to_string())
}
