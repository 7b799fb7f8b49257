//! Transaction data models and API request types.
//!
//! This module defines:
//! - `Transaction`: an immutable record of a credit or debit
//! - `TransactionType`: the direction of the money
//! - `CreateTransactionRequest`: request body for recording a transaction

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Direction of a transaction.
///
/// Serialized in lower case (`"credit"`, `"debit"`). Any other value in a
/// request body is rejected during deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Credit,
    Debit,
}

impl TransactionType {
    /// Signed balance change that a transaction of this type applies.
    pub fn delta(self, amount: Decimal) -> Decimal {
        match self {
            TransactionType::Credit => amount,
            TransactionType::Debit => -amount,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionType::Credit => f.write_str("credit"),
            TransactionType::Debit => f.write_str("debit"),
        }
    }
}

/// A recorded transaction.
///
/// Created only after the Accounts service accepted the balance update, and
/// never modified afterwards.
///
/// # JSON Example
///
/// ```json
/// {
///   "transaction_id": "tx-3f9a1c0b7e",
///   "account_id": "88fd34c4-0450-43d3-b93f-25842c0e3a6c",
///   "date": "2025-12-21T16:00:00Z",
///   "amount": 200.0,
///   "description": "Groceries",
///   "transaction_type": "debit"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// `tx-` followed by 10 lowercase hex characters
    pub transaction_id: String,

    /// Account the transaction was applied to (owned by the Accounts service)
    pub account_id: Uuid,

    /// Creation time
    pub date: DateTime<Utc>,

    /// Always positive; the direction is carried by `transaction_type`
    pub amount: Decimal,

    pub description: String,

    pub transaction_type: TransactionType,
}

impl Transaction {
    /// Build a new record stamped with a fresh id and the current time.
    pub fn new(
        account_id: Uuid,
        amount: Decimal,
        description: String,
        transaction_type: TransactionType,
    ) -> Self {
        Self {
            transaction_id: generate_transaction_id(),
            account_id,
            date: Utc::now(),
            amount,
            description,
            transaction_type,
        }
    }
}

fn generate_transaction_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("tx-{}", &hex[..10])
}

/// Request body for `POST /accounts/{account_id}/transactions`.
///
/// # JSON Example
///
/// ```json
/// {
///   "amount": 500.00,
///   "description": "Salary",
///   "transaction_type": "credit"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTransactionRequest {
    pub amount: Decimal,
    pub description: String,
    pub transaction_type: TransactionType,
}
