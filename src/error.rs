//! Error types and HTTP error response handling.
//!
//! This module defines the API-facing error and how it is converted into an
//! HTTP response with the fixed `{error_code, message}` envelope.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::services::accounts_client::AccountsError;
use crate::store::StoreError;

/// Machine-readable error codes carried in every error response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    BadRequest,
    InsufficientFunds,
    InternalError,
}

/// Error response body.
///
/// ```json
/// {
///   "error_code": "NOT_FOUND",
///   "message": "Account 88fd34c4-0450-43d3-b93f-25842c0e3a6c Not Found"
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error_code: ErrorCode,
    pub message: String,
}

/// Application-wide error type.
///
/// # Status Code Mapping
///
/// - `InvalidTransaction` → 400 `BAD_REQUEST`
/// - `BadRequest` → 400 `BAD_REQUEST`
/// - `AccountNotFound` → 404 `NOT_FOUND`
/// - `InsufficientFunds` → 400 `INSUFFICIENT_FUNDS`
/// - `Internal` → 500 `INTERNAL_ERROR`
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The requested amount fails validation.
    #[error("Bad Transaction: {0}")]
    InvalidTransaction(String),

    /// Malformed path or body, or a request the Accounts service rejected.
    #[error("Bad Request: {0}")]
    BadRequest(String),

    /// The Accounts service does not know the account.
    #[error("Account {0} Not Found")]
    AccountNotFound(Uuid),

    /// A debit larger than the current balance.
    #[error("Insufficient Funds: {0}")]
    InsufficientFunds(String),

    /// Integration failure with the Accounts service or the store.
    #[error("Internal Server Error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn insufficient_balance(balance: Decimal, requested: Decimal) -> Self {
        AppError::InsufficientFunds(format!(
            "balance is {balance}, attempted to debit {requested}"
        ))
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::InvalidTransaction(_) | AppError::BadRequest(_) => ErrorCode::BadRequest,
            AppError::AccountNotFound(_) => ErrorCode::NotFound,
            AppError::InsufficientFunds(_) => ErrorCode::InsufficientFunds,
            AppError::Internal(_) => ErrorCode::InternalError,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidTransaction(_)
            | AppError::BadRequest(_)
            | AppError::InsufficientFunds(_) => StatusCode::BAD_REQUEST,
            AppError::AccountNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Convert an Accounts client failure for a given account.
    ///
    /// Upstream 404s become `AccountNotFound`, refused debits become
    /// `InsufficientFunds`, and transport or unexpected responses become
    /// `Internal`.
    pub fn from_accounts(account_id: Uuid, err: AccountsError) -> Self {
        match err {
            AccountsError::NotFound => AppError::AccountNotFound(account_id),
            AccountsError::InsufficientFunds(msg) => AppError::InsufficientFunds(msg),
            AccountsError::BadRequest(msg) => AppError::BadRequest(msg),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        let body = Json(ErrorResponse {
            error_code: self.code(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}
