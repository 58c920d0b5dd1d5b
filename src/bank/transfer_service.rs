//! Funds transfer between two accounts.
//!
//! Validation of the request happens before the store is touched. Both
//! account lookups, both balance writes and the record insert run inside one
//! atomic unit; any early return drops the unit, which rolls it back.

use std::sync::Arc;

use super::error::{BankError, RECIPIENT_NOT_FOUND, SENDER_NOT_FOUND};
use super::models::{NewTransfer, TransferCommand, TransferRecord, UserId};
use super::store::BankStore;
use crate::money::{Currency, MAX_BALANCE, validate_amount};

#[derive(Clone)]
pub struct TransferService {
    store: Arc<dyn BankStore>,
}

impl TransferService {
    pub fn new(store: Arc<dyn BankStore>) -> Self {
        Self { store }
    }

    /// Move `cmd.amount` from one of the user's accounts to the account
    /// identified by number and bank. The recipient may belong to anyone.
    pub async fn execute(
        &self,
        user_id: UserId,
        cmd: TransferCommand,
    ) -> Result<TransferRecord, BankError> {
        // 1. Validation (no state touched)
        let currency = Currency::parse(&cmd.currency)?;
        let amount = validate_amount(cmd.amount, currency)?;

        // 2. Atomic unit
        let mut unit = self.store.begin().await?;

        let mut from = unit
            .find_owned_account(cmd.from_account_id, user_id)
            .await?
            .ok_or_else(|| BankError::not_found(SENDER_NOT_FOUND))?;

        let mut to = unit
            .find_account_by_number(&cmd.account_no, &cmd.bank_name)
            .await?
            .ok_or_else(|| BankError::not_found(RECIPIENT_NOT_FOUND))?;

        if from.id == to.id {
            return Err(BankError::validation(
                "Source and destination accounts are the same",
            ));
        }

        if from.balance < amount {
            tracing::warn!(
                user_id,
                from_account_id = from.id,
                balance = %from.balance,
                amount = %amount,
                "Transfer rejected: insufficient funds"
            );
            return Err(BankError::InsufficientFunds);
        }

        from.balance -= amount;
        to.balance = to
            .balance
            .checked_add(amount)
            .filter(|b| *b <= MAX_BALANCE)
            .ok_or_else(|| BankError::validation("Amount would overflow recipient balance"))?;

        unit.update_account(&from).await?;
        unit.update_account(&to).await?;
        let record = unit
            .insert_transfer(NewTransfer {
                user_id,
                from_account_id: from.id,
                to_account_id: to.id,
                amount,
                currency: currency.code().to_string(),
            })
            .await?;

        unit.commit().await?;

        tracing::info!(
            transfer_id = record.id,
            user_id,
            from_account_id = record.from_account_id,
            to_account_id = record.to_account_id,
            amount = %record.amount,
            store = self.store.name(),
            "Transfer committed"
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::models::{Account, AccountId, NewAccount};
    use crate::bank::store::MemoryStore;
    use rust_decimal::Decimal;

    struct TestHarness {
        store: MemoryStore,
        service: TransferService,
    }

    impl TestHarness {
        fn new() -> Self {
            let store = MemoryStore::new();
            let service = TransferService::new(Arc::new(store.clone()));
            Self { store, service }
        }

        async fn open(&self, user_id: UserId, account_no: &str, balance: i64) -> Account {
            let account = self
                .store
                .create_account(NewAccount {
                    user_id,
                    owner: format!("user-{}", user_id),
                    account_no: account_no.to_string(),
                    bank_name: "Test Bank".to_string(),
                })
                .await
                .unwrap();
            self.store
                .set_balance(account.id, Decimal::from(balance))
                .await;
            self.store.account(account.id).await.unwrap()
        }

        async fn balance(&self, id: AccountId) -> Decimal {
            self.store.account(id).await.unwrap().balance
        }
    }

    fn cmd(from: AccountId, to: &Account, amount: i64, currency: &str) -> TransferCommand {
        TransferCommand {
            from_account_id: from,
            account_no: to.account_no.clone(),
            bank_name: to.bank_name.clone(),
            amount: Decimal::from(amount),
            currency: currency.to_string(),
        }
    }

    // ========================================================================
    // Happy Path Tests
    // ========================================================================

    #[tokio::test]
    async fn test_transfer_moves_funds_and_records() {
        let h = TestHarness::new();
        let a = h.open(1, "A", 100).await;
        let b = h.open(2, "B", 0).await;

        let record = h.service.execute(1, cmd(a.id, &b, 40, "USD")).await.unwrap();

        assert_eq!(record.user_id, 1);
        assert_eq!(record.from_account_id, a.id);
        assert_eq!(record.to_account_id, b.id);
        assert_eq!(record.amount, Decimal::from(40));
        assert_eq!(record.currency, "USD");
        assert_eq!(h.balance(a.id).await, Decimal::from(60));
        assert_eq!(h.balance(b.id).await, Decimal::from(40));
        assert_eq!(h.store.transfer_count().await, 1);
    }

    #[tokio::test]
    async fn test_sum_of_balances_is_invariant() {
        let h = TestHarness::new();
        let a = h.open(1, "A", 250).await;
        let b = h.open(1, "B", 75).await;

        for amount in [10, 25, 1, 100] {
            h.service
                .execute(1, cmd(a.id, &b, amount, "USD"))
                .await
                .unwrap();
            assert_eq!(
                h.balance(a.id).await + h.balance(b.id).await,
                Decimal::from(325)
            );
        }
        assert_eq!(h.balance(a.id).await, Decimal::from(114));
    }

    #[tokio::test]
    async fn test_transfer_entire_balance() {
        let h = TestHarness::new();
        let a = h.open(1, "A", 50).await;
        let b = h.open(2, "B", 0).await;

        h.service.execute(1, cmd(a.id, &b, 50, "USD")).await.unwrap();
        assert_eq!(h.balance(a.id).await, Decimal::ZERO);
    }

    // ========================================================================
    // Rejection Tests
    // ========================================================================

    #[tokio::test]
    async fn test_insufficient_funds_changes_nothing() {
        let h = TestHarness::new();
        let a = h.open(1, "A", 60).await;
        let b = h.open(2, "B", 40).await;

        let err = h
            .service
            .execute(1, cmd(a.id, &b, 150, "USD"))
            .await
            .unwrap_err();

        assert_eq!(err, BankError::InsufficientFunds);
        assert_eq!(h.balance(a.id).await, Decimal::from(60));
        assert_eq!(h.balance(b.id).await, Decimal::from(40));
        assert_eq!(h.store.transfer_count().await, 0);
    }

    #[tokio::test]
    async fn test_sender_must_be_owned_by_user() {
        let h = TestHarness::new();
        let a = h.open(1, "A", 100).await;
        let b = h.open(2, "B", 0).await;

        // user 2 tries to spend from user 1's account
        let err = h
            .service
            .execute(2, cmd(a.id, &b, 10, "USD"))
            .await
            .unwrap_err();

        assert_eq!(err, BankError::not_found(SENDER_NOT_FOUND));
        assert_eq!(h.balance(a.id).await, Decimal::from(100));
    }

    #[tokio::test]
    async fn test_unknown_recipient() {
        let h = TestHarness::new();
        let a = h.open(1, "A", 100).await;

        let mut c = cmd(a.id, &a, 10, "USD");
        c.account_no = "NOPE".to_string();
        let err = h.service.execute(1, c).await.unwrap_err();
        assert_eq!(err, BankError::not_found(RECIPIENT_NOT_FOUND));

        // right number, wrong bank
        let b = h.open(2, "B", 0).await;
        let mut c = cmd(a.id, &b, 10, "USD");
        c.bank_name = "Other Bank".to_string();
        let err = h.service.execute(1, c).await.unwrap_err();
        assert_eq!(err, BankError::not_found(RECIPIENT_NOT_FOUND));
    }

    #[tokio::test]
    async fn test_non_usd_currency_always_rejected() {
        let h = TestHarness::new();
        let a = h.open(1, "A", 100).await;
        let b = h.open(2, "B", 0).await;

        for currency in ["EUR", "usd", ""] {
            let err = h
                .service
                .execute(1, cmd(a.id, &b, 10, currency))
                .await
                .unwrap_err();
            assert!(matches!(err, BankError::Validation(_)));
        }

        // currency wins even when every other field is also wrong
        let err = h
            .service
            .execute(99, cmd(12345, &b, 1_000_000, "GBP"))
            .await
            .unwrap_err();
        assert_eq!(err, BankError::validation("Only USD is supported"));

        assert_eq!(h.balance(a.id).await, Decimal::from(100));
        assert_eq!(h.store.transfer_count().await, 0);
    }

    #[tokio::test]
    async fn test_non_positive_amount_rejected() {
        let h = TestHarness::new();
        let a = h.open(1, "A", 100).await;
        let b = h.open(2, "B", 0).await;

        for amount in [0, -10] {
            let err = h
                .service
                .execute(1, cmd(a.id, &b, amount, "USD"))
                .await
                .unwrap_err();
            assert!(matches!(err, BankError::Validation(_)));
        }
        assert_eq!(h.balance(a.id).await, Decimal::from(100));
    }

    #[tokio::test]
    async fn test_amount_and_credit_capped_at_column_limit() {
        let h = TestHarness::new();
        let a = h.open(1, "A", 100).await;
        let b = h.open(2, "B", 0).await;
        h.store.set_balance(b.id, MAX_BALANCE).await;

        // Larger than any balance can hold: rejected before the store is touched
        let mut oversized = cmd(a.id, &b, 0, "USD");
        oversized.amount = MAX_BALANCE + Decimal::ONE;
        let err = h.service.execute(1, oversized).await.unwrap_err();
        assert!(matches!(err, BankError::Validation(_)));
        assert_eq!(err.http_status(), 400);

        // Recipient already at the ceiling
        let err = h
            .service
            .execute(1, cmd(a.id, &b, 1, "USD"))
            .await
            .unwrap_err();
        assert!(matches!(err, BankError::Validation(_)));
        assert_eq!(h.balance(a.id).await, Decimal::from(100));
        assert_eq!(h.balance(b.id).await, MAX_BALANCE);
        assert_eq!(h.store.transfer_count().await, 0);
    }

    #[tokio::test]
    async fn test_self_transfer_rejected() {
        let h = TestHarness::new();
        let a = h.open(1, "A", 100).await;

        let err = h
            .service
            .execute(1, cmd(a.id, &a, 10, "USD"))
            .await
            .unwrap_err();
        assert!(matches!(err, BankError::Validation(_)));
        assert_eq!(h.store.transfer_count().await, 0);
    }

    // ========================================================================
    // Atomicity & Concurrency Tests
    // ========================================================================

    #[tokio::test]
    async fn test_failed_record_insert_rolls_back_balances() {
        let h = TestHarness::new();
        let a = h.open(1, "A", 100).await;
        let b = h.open(2, "B", 0).await;

        h.store.set_fail_next_transfer_insert(true);
        let err = h
            .service
            .execute(1, cmd(a.id, &b, 40, "USD"))
            .await
            .unwrap_err();

        assert!(matches!(err, BankError::Persistence(_)));
        assert_eq!(err.http_status(), 500);
        assert_eq!(h.balance(a.id).await, Decimal::from(100));
        assert_eq!(h.balance(b.id).await, Decimal::ZERO);
        assert_eq!(h.store.transfer_count().await, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_transfers_never_overdraw() {
        let h = TestHarness::new();
        let a = h.open(1, "A", 100).await;
        let b = h.open(2, "B", 0).await;

        // 10 concurrent transfers of 30 against a balance of 100: exactly 3 fit
        let handles: Vec<_> = (0..10)
            .map(|_| {
                let service = h.service.clone();
                let c = cmd(a.id, &b, 30, "USD");
                tokio::spawn(async move { service.execute(1, c).await })
            })
            .collect();

        let mut ok = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => ok += 1,
                Err(e) => assert_eq!(e, BankError::InsufficientFunds),
            }
        }

        assert_eq!(ok, 3);
        assert_eq!(h.balance(a.id).await, Decimal::from(10));
        assert_eq!(h.balance(b.id).await, Decimal::from(90));
        assert_eq!(h.store.transfer_count().await, 3);
    }
}
