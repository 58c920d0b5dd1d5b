//! HTTP handlers

pub mod account;
pub mod health;
pub mod transfer;

pub use account::{create_account, delete_account, list_accounts};
pub use health::{HealthResponse, health_check};
pub use transfer::{create_transfer, list_transfers};

use crate::bank::BankError;

/// Store failures reach the client as a bare "Transaction failed"; the
/// driver detail is logged here instead.
fn log_store_failure(operation: &'static str, user_id: i64, e: &BankError) {
    if let BankError::Persistence(detail) = e {
        tracing::error!(user_id, operation, error = %detail, "Store operation failed");
    }
}
