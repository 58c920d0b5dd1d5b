//! Bank Error Types
//!
//! Every failure of an account or transfer operation maps onto one of four
//! kinds. All of them are terminal for the request.

use thiserror::Error;

use super::store::StoreError;
use crate::money::MoneyError;

pub const SENDER_NOT_FOUND: &str = "Sender account not found or not owned by user";
pub const RECIPIENT_NOT_FOUND: &str = "Recipient account not found";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BankError {
    /// Malformed input, unsupported currency, non-positive amount
    #[error("{0}")]
    Validation(String),

    /// Missing account, or an account the user does not own
    #[error("{0}")]
    NotFound(String),

    #[error("Insufficient funds")]
    InsufficientFunds,

    /// The atomic unit failed and was rolled back
    #[error("Transaction failed: {0}")]
    Persistence(String),
}

impl BankError {
    pub fn validation(msg: impl Into<String>) -> Self {
        BankError::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        BankError::NotFound(msg.into())
    }

    /// Get the error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            BankError::Validation(_) => "VALIDATION_ERROR",
            BankError::NotFound(_) => "NOT_FOUND",
            BankError::InsufficientFunds => "INSUFFICIENT_FUNDS",
            BankError::Persistence(_) => "PERSISTENCE_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn http_status(&self) -> u16 {
        match self {
            BankError::Validation(_) | BankError::NotFound(_) | BankError::InsufficientFunds => {
                400
            }
            BankError::Persistence(_) => 500,
        }
    }
}

impl From<StoreError> for BankError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateAccountNumber => {
                BankError::Validation("Account number already exists".to_string())
            }
            other => BankError::Persistence(other.to_string()),
        }
    }
}

impl From<MoneyError> for BankError {
    fn from(e: MoneyError) -> Self {
        BankError::Validation(e.to_string())
    }
}
