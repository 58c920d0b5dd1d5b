//! Data models for bank accounts and transfer records

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

pub type UserId = i64;
pub type AccountId = i64;
pub type TransferId = i64;

/// Balance-holding account owned by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Account {
    #[schema(example = 1)]
    pub id: AccountId,
    #[schema(example = 1)]
    pub user_id: UserId,
    #[schema(example = "Alice")]
    pub owner: String,
    #[schema(example = "1234567890")]
    pub account_no: String,
    #[schema(example = "First Bank")]
    pub bank_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 100.0)]
    pub balance: Decimal,
}

/// Fields required to open an account. The balance always starts at zero.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub user_id: UserId,
    pub owner: String,
    pub account_no: String,
    pub bank_name: String,
}

/// Immutable record of a completed transfer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TransferRecord {
    #[schema(example = 1)]
    pub id: TransferId,
    #[schema(example = 1)]
    pub user_id: UserId,
    #[schema(example = 1)]
    pub from_account_id: AccountId,
    #[schema(example = 2)]
    pub to_account_id: AccountId,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 40.0)]
    pub amount: Decimal,
    #[schema(example = "USD")]
    pub currency: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTransfer {
    pub user_id: UserId,
    pub from_account_id: AccountId,
    pub to_account_id: AccountId,
    pub amount: Decimal,
    pub currency: String,
}

/// Transfer command as accepted by the transfer service
#[derive(Debug, Clone)]
pub struct TransferCommand {
    pub from_account_id: AccountId,
    pub account_no: String,
    pub bank_name: String,
    pub amount: Decimal,
    pub currency: String,
}
