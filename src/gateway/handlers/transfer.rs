//! Transfer handlers

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};

use super::super::state::AppState;
use super::super::types::{ApiResult, ErrorBody, TransferRequest, parse_id};
use crate::bank::{BankError, TransferRecord};

/// One log line per failed transfer; persistence failures carry the driver
/// detail that the response hides.
fn log_failure(user_id: i64, e: &BankError) {
    match e {
        BankError::Persistence(detail) => {
            tracing::error!(user_id, code = e.code(), error = %detail, "Transfer rolled back")
        }
        _ => tracing::warn!(user_id, code = e.code(), "Transfer failed: {}", e),
    }
}

/// Transfer funds from one of the user's accounts
///
/// POST /users/{userId}/transactions
#[utoipa::path(
    post,
    path = "/users/{userId}/transactions",
    params(("userId" = i64, Path, description = "User who owns the source account")),
    request_body = TransferRequest,
    responses(
        (status = 201, description = "Transfer committed", body = TransferRecord),
        (status = 400, description = "Validation, not found or insufficient funds", body = ErrorBody),
        (status = 500, description = "Transaction failed and was rolled back", body = ErrorBody)
    ),
    tag = "Transactions"
)]
pub async fn create_transfer(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    payload: Result<Json<TransferRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<TransferRecord>)> {
    let user_id = parse_id("userId", &user_id)?;
    let Json(req) = payload?;

    tracing::debug!(
        user_id,
        from_account_id = req.from_account_id,
        to_account_no = %req.account_no,
        to_bank = %req.bank_name,
        amount = %req.amount,
        currency = %req.currency,
        "Transfer request"
    );

    match state.transfers.execute(user_id, req.into()).await {
        Ok(record) => Ok((StatusCode::CREATED, Json(record))),
        Err(e) => {
            log_failure(user_id, &e);
            Err(e.into())
        }
    }
}

/// List transfers made by a user
///
/// GET /users/{userId}/transactions
#[utoipa::path(
    get,
    path = "/users/{userId}/transactions",
    params(("userId" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Transfer records, empty array when none", body = [TransferRecord]),
        (status = 400, description = "Invalid user ID", body = ErrorBody)
    ),
    tag = "Transactions"
)]
pub async fn list_transfers(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Vec<TransferRecord>>> {
    let user_id = parse_id("userId", &user_id)?;
    let records = state
        .accounts
        .transfers(user_id)
        .await
        .inspect_err(|e| super::log_store_failure("list_transfers", user_id, e))?;
    Ok(Json(records))
}
