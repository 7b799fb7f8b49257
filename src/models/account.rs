//! Account view returned by the Accounts service.
//!
//! Accounts are owned upstream. This service only reads the balance to
//! validate debits and never stores it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Account state as reported by the Accounts service.
///
/// Fields other than `account_id` and `balance` are ignored.
///
/// # JSON Example
///
/// ```json
/// {
///   "account_id": "88fd34c4-0450-43d3-b93f-25842c0e3a6c",
///   "type": "checking",
///   "balance": 1000.00
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AccountSnapshot {
    #[serde(default)]
    pub account_id: Option<String>,

    pub balance: Decimal,
}

impl AccountSnapshot {
    pub fn covers(&self, amount: Decimal) -> bool {
        self.balance >= amount
    }
}

/// Body sent to the Accounts credit/debit endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct BalanceChangeRequest {
    pub amount: Decimal,
}
