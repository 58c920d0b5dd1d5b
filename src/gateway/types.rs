//! Gateway types
//!
//! - Request bodies for the account and transaction endpoints
//! - [`ApiError`]: JSON error envelope with its HTTP status
//! - Path parameter parsing

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::bank::{BankError, TransferCommand};

// ============================================================================
// Requests
// ============================================================================

/// Body of `POST /users/{userId}/accounts`. Any balance sent is ignored.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAccountRequest {
    #[schema(example = "Alice")]
    pub owner: String,
    #[schema(example = "1234567890")]
    pub account_no: String,
    #[schema(example = "First Bank")]
    pub bank_name: String,
}

/// Body of `POST /users/{userId}/transactions`
#[derive(Debug, Deserialize, ToSchema)]
pub struct TransferRequest {
    #[schema(example = 1)]
    pub from_account_id: i64,
    /// Recipient account number
    #[schema(example = "9876543210")]
    pub account_no: String,
    /// Recipient bank
    #[schema(example = "Second Bank")]
    pub bank_name: String,
    /// Number or numeric string
    #[schema(value_type = f64, example = 40.0)]
    pub amount: Decimal,
    #[schema(example = "USD")]
    pub currency: String,
}

impl From<TransferRequest> for TransferCommand {
    fn from(req: TransferRequest) -> Self {
        TransferCommand {
            from_account_id: req.from_account_id,
            account_no: req.account_no,
            bank_name: req.bank_name,
            amount: req.amount,
            currency: req.currency,
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Error response body
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    #[schema(example = "Insufficient funds")]
    pub error: String,
    #[schema(example = "INSUFFICIENT_FUNDS")]
    pub code: String,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
    }
}

impl From<BankError> for ApiError {
    fn from(e: BankError) -> Self {
        let status =
            StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let message = match &e {
            // Driver details are logged by the handler, never returned
            BankError::Persistence(_) => "Transaction failed".to_string(),
            other => other.to_string(),
        };
        Self::new(status, e.code(), message)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
            code: self.code.to_string(),
        };
        (self.status, Json(body)).into_response()
    }
}

// ============================================================================
// Path parameters
// ============================================================================

/// Parse a numeric path segment. Non-numeric or non-positive input is a
/// validation error rather than a silent zero.
pub fn parse_id(name: &str, raw: &str) -> ApiResult<i64> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::bad_request(format!(
            "Invalid {}: {:?} is not a positive integer",
            name, raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("userId", "42").unwrap(), 42);
        for bad in ["abc", "", "0", "-3", "1.5", "9999999999999999999999"] {
            let err = parse_id("userId", bad).unwrap_err();
            assert_eq!(err.status, StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_bank_error_mapping() {
        let err = ApiError::from(BankError::InsufficientFunds);
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Insufficient funds");

        let err = ApiError::from(BankError::Persistence("could not serialize access".into()));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code, "PERSISTENCE_ERROR");
        assert_eq!(err.message, "Transaction failed");
        assert!(!err.message.contains("serialize"));
    }

    #[test]
    fn test_bank_error_mapping_is_repeatable() {
        // Same input, same envelope: the conversion has no side channel
        let a = ApiError::from(BankError::Persistence("deadlock detected".into()));
        let b = ApiError::from(BankError::Persistence("deadlock detected".into()));
        assert_eq!((a.status, a.code, a.message), (b.status, b.code, b.message));
    }

    #[test]
    fn test_transfer_request_accepts_number_or_string_amount() {
        let req: TransferRequest = serde_json::from_str(
            r#"{"from_account_id":1,"account_no":"B","bank_name":"X","amount":40.5,"currency":"USD"}"#,
        )
        .unwrap();
        assert_eq!(req.amount, Decimal::new(405, 1));

        let req: TransferRequest = serde_json::from_str(
            r#"{"from_account_id":1,"account_no":"B","bank_name":"X","amount":"12.25","currency":"USD"}"#,
        )
        .unwrap();
        assert_eq!(req.amount, Decimal::new(1225, 2));
    }
}
