//! Transaction HTTP handlers.
//!
//! This module implements the transaction endpoints:
//! - GET /accounts/{account_id}/transactions - list an account's transactions
//! - POST /accounts/{account_id}/transactions - record a credit or debit
//!
//! Path and body rejections are turned into `BAD_REQUEST` envelopes instead
//! of axum's default plain-text responses.

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    app::AppState,
    error::AppError,
    models::transaction::{CreateTransactionRequest, Transaction},
};

/// List all transactions for an account.
///
/// # Response
///
/// - **Success (200 OK)**: array of transactions, oldest first (may be empty)
/// - **Error (404)**: account unknown to the Accounts service
/// - **Error (500)**: Accounts service unreachable or failing
///
/// ```json
/// [
///   {
///     "transaction_id": "tx-3f9a1c0b7e",
///     "account_id": "88fd34c4-0450-43d3-b93f-25842c0e3a6c",
///     "date": "2025-12-21T16:00:00Z",
///     "amount": 500.0,
///     "description": "Salary",
///     "transaction_type": "credit"
///   }
/// ]
/// ```
pub async fn list_transactions(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let Path(account_id) = path?;

    let transactions = state.transactions.list(account_id).await?;

    Ok(Json(transactions))
}

/// Record a credit or debit for an account.
///
/// # Request Body
///
/// ```json
/// {
///   "amount": 200.00,
///   "description": "Groceries",
///   "transaction_type": "debit"
/// }
/// ```
///
/// # Response
///
/// - **Success (201 Created)**: the recorded transaction
/// - **Error (400)**: `BAD_REQUEST` (invalid body or amount) or `INSUFFICIENT_FUNDS`
/// - **Error (404)**: account unknown to the Accounts service
/// - **Error (500)**: Accounts service or store failure
pub async fn create_transaction(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<CreateTransactionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Transaction>), AppError> {
    let Path(account_id) = path?;
    let Json(request) = body?;

    let transaction = state
        .transactions
        .record(
            account_id,
            request.amount,
            request.description,
            request.transaction_type,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(transaction)))
}
