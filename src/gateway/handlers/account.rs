//! Account handlers (create, list, delete)

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};

use super::super::state::AppState;
use super::super::types::{ApiResult, CreateAccountRequest, ErrorBody, parse_id};
use crate::bank::Account;

/// Create an account for a user
///
/// POST /users/{userId}/accounts
#[utoipa::path(
    post,
    path = "/users/{userId}/accounts",
    params(("userId" = i64, Path, description = "Owning user ID")),
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created with zero balance", body = Account),
        (status = 400, description = "Invalid input or duplicate account number", body = ErrorBody),
        (status = 500, description = "Persistence failure", body = ErrorBody)
    ),
    tag = "Accounts"
)]
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    payload: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Account>)> {
    let user_id = parse_id("userId", &user_id)?;
    let Json(req) = payload?;

    let account = state
        .accounts
        .create(user_id, &req.owner, &req.account_no, &req.bank_name)
        .await
        .inspect_err(|e| super::log_store_failure("create_account", user_id, e))?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// List a user's accounts
///
/// GET /users/{userId}/accounts
#[utoipa::path(
    get,
    path = "/users/{userId}/accounts",
    params(("userId" = i64, Path, description = "Owning user ID")),
    responses(
        (status = 200, description = "Accounts, empty array when none", body = [Account]),
        (status = 400, description = "Invalid user ID", body = ErrorBody)
    ),
    tag = "Accounts"
)]
pub async fn list_accounts(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Vec<Account>>> {
    let user_id = parse_id("userId", &user_id)?;
    let accounts = state
        .accounts
        .list(user_id)
        .await
        .inspect_err(|e| super::log_store_failure("list_accounts", user_id, e))?;
    Ok(Json(accounts))
}

/// Delete one of a user's accounts
///
/// DELETE /users/{userId}/accounts/{id}
///
/// Always 204 on a well-formed request; accounts owned by someone else are
/// left untouched.
#[utoipa::path(
    delete,
    path = "/users/{userId}/accounts/{id}",
    params(
        ("userId" = i64, Path, description = "Owning user ID"),
        ("id" = i64, Path, description = "Account ID")
    ),
    responses(
        (status = 204, description = "Deleted (or nothing owned to delete)"),
        (status = 400, description = "Invalid path parameter", body = ErrorBody)
    ),
    tag = "Accounts"
)]
pub async fn delete_account(
    State(state): State<Arc<AppState>>,
    Path((user_id, account_id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    let user_id = parse_id("userId", &user_id)?;
    let account_id = parse_id("id", &account_id)?;

    state
        .accounts
        .delete(user_id, account_id)
        .await
        .inspect_err(|e| super::log_store_failure("delete_account", user_id, e))?;
    Ok(StatusCode::NO_CONTENT)
}
