//! Transaction service - core workflow for recording transactions.
//!
//! This service handles:
//! - Amount validation
//! - Account existence and balance checks against the Accounts service
//! - Forwarding the balance change upstream
//! - Persisting the record locally
//!
//! # Consistency
//!
//! The balance update happens in the Accounts service and the record is
//! appended locally afterwards. The two steps are not atomic: if the append
//! fails after the upstream update succeeded, the balance has moved without a
//! local record. That window is logged and reported as an internal error, and
//! nothing is rolled back.

use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::transaction::{Transaction, TransactionType},
    services::accounts_client::AccountsApi,
    store::TransactionStore,
};

/// Maximum number of decimal places accepted in an amount.
pub const MAX_AMOUNT_SCALE: u32 = 2;

/// Validate a requested amount.
///
/// # Rules
///
/// - Must be strictly positive
/// - At most two decimal places (trailing zeros do not count)
pub fn validate_amount(amount: Decimal) -> Result<(), AppError> {
    if amount <= Decimal::ZERO {
        return Err(AppError::InvalidTransaction(
            "Amount must be greater than zero".to_string(),
        ));
    }

    if amount.normalize().scale() > MAX_AMOUNT_SCALE {
        return Err(AppError::InvalidTransaction(format!(
            "Amount must not have more than {MAX_AMOUNT_SCALE} decimal places"
        )));
    }

    Ok(())
}

/// Orchestrates the Accounts client and the transaction store.
#[derive(Clone)]
pub struct TransactionService {
    accounts: Arc<dyn AccountsApi>,
    store: Arc<dyn TransactionStore>,
}

impl TransactionService {
    pub fn new(accounts: Arc<dyn AccountsApi>, store: Arc<dyn TransactionStore>) -> Self {
        Self { accounts, store }
    }

    /// Record a credit or debit against an account.
    ///
    /// # Process
    ///
    /// 1. Validate the amount (no external call on failure)
    /// 2. Fetch the account from the Accounts service
    /// 3. For debits, check the current balance covers the amount
    /// 4. Apply the balance change upstream
    /// 5. Append the record to the store
    ///
    /// # Errors
    ///
    /// - `InvalidTransaction`: amount is not positive or has too many decimals
    /// - `AccountNotFound`: the Accounts service does not know the account
    /// - `InsufficientFunds`: debit exceeds the current balance
    /// - `Internal`: the Accounts service or the store failed
    pub async fn record(
        &self,
        account_id: Uuid,
        amount: Decimal,
        description: String,
        transaction_type: TransactionType,
    ) -> Result<Transaction, AppError> {
        validate_amount(amount)?;

        let account = self
            .accounts
            .get_account(account_id)
            .await
            .map_err(|e| AppError::from_accounts(account_id, e))?;

        if transaction_type == TransactionType::Debit && !account.covers(amount) {
            tracing::warn!(
                "Debit of {} refused for {}: balance is {}",
                amount,
                account_id,
                account.balance
            );
            return Err(AppError::insufficient_balance(account.balance, amount));
        }

        self.accounts
            .adjust_balance(account_id, transaction_type.delta(amount))
            .await
            .map_err(|e| AppError::from_accounts(account_id, e))?;

        let transaction = Transaction::new(account_id, amount, description, transaction_type);

        if let Err(e) = self.store.append(account_id, transaction.clone()).await {
            // Upstream balance already changed; there is no compensation step.
            tracing::error!(
                "Balance of {} changed by {} but transaction {} was not stored: {}",
                account_id,
                transaction_type.delta(amount),
                transaction.transaction_id,
                e
            );
            return Err(e.into());
        }

        tracing::info!(
            "Recorded {} {} of {} for {}",
            transaction_type,
            transaction.transaction_id,
            amount,
            account_id
        );

        Ok(transaction)
    }

    /// All transactions for an account, oldest first.
    ///
    /// The account must exist upstream; an existing account with no history
    /// yields an empty list.
    pub async fn list(&self, account_id: Uuid) -> Result<Vec<Transaction>, AppError> {
        self.accounts
            .get_account(account_id)
            .await
            .map_err(|e| AppError::from_accounts(account_id, e))?;

        Ok(self.store.list_for(account_id).await?)
    }

    /// Whether the Accounts service answers its health probe.
    pub async fn accounts_healthy(&self) -> bool {
        self.accounts.check_health().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::account::AccountSnapshot;
    use crate::services::accounts_client::AccountsError;
    use crate::store::{InMemoryTransactionStore, StoreError};
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Accounts double that keeps balances in memory and records every call.
    #[derive(Default)]
    struct StubAccounts {
        balances: Mutex<HashMap<Uuid, Decimal>>,
        calls: Mutex<Vec<String>>,
        refuse_debits: bool,
        healthy: bool,
    }

    impl StubAccounts {
        fn with_account(id: Uuid, balance: Decimal) -> Self {
            let stub = Self {
                healthy: true,
                ..Default::default()
            };
            stub.balances.lock().unwrap().insert(id, balance);
            stub
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn balance(&self, id: Uuid) -> Decimal {
            self.balances.lock().unwrap()[&id]
        }
    }

    #[async_trait]
    impl AccountsApi for StubAccounts {
        async fn get_account(&self, account_id: Uuid) -> Result<AccountSnapshot, AccountsError> {
            self.calls.lock().unwrap().push(format!("get {account_id}"));
            self.balances
                .lock()
                .unwrap()
                .get(&account_id)
                .map(|balance| AccountSnapshot {
                    account_id: Some(account_id.to_string()),
                    balance: *balance,
                })
                .ok_or(AccountsError::NotFound)
        }

        async fn adjust_balance(
            &self,
            account_id: Uuid,
            delta: Decimal,
        ) -> Result<(), AccountsError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("adjust {account_id} {delta}"));
            if self.refuse_debits && delta < Decimal::ZERO {
                return Err(AccountsError::InsufficientFunds(
                    "Account balance too low".to_string(),
                ));
            }
            let mut balances = self.balances.lock().unwrap();
            let balance = balances.get_mut(&account_id).ok_or(AccountsError::NotFound)?;
            *balance += delta;
            Ok(())
        }

        async fn check_health(&self) -> bool {
            self.healthy
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl TransactionStore for BrokenStore {
        async fn append(&self, _: Uuid, _: Transaction) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("disk full".to_string()))
        }

        async fn list_for(&self, _: Uuid) -> Result<Vec<Transaction>, StoreError> {
            Ok(Vec::new())
        }
    }

    fn service(accounts: Arc<StubAccounts>) -> TransactionService {
        TransactionService::new(accounts, Arc::new(InMemoryTransactionStore::new()))
    }

    #[test]
    fn amount_validation() {
        assert!(validate_amount(dec!(0.01)).is_ok());
        assert!(validate_amount(dec!(100)).is_ok());
        assert!(validate_amount(dec!(100.10)).is_ok());
        assert!(validate_amount(dec!(100.100)).is_ok());

        assert!(matches!(validate_amount(dec!(0)), Err(AppError::InvalidTransaction(_))));
        assert!(matches!(validate_amount(dec!(-5)), Err(AppError::InvalidTransaction(_))));
        assert!(matches!(
            validate_amount(dec!(100.123)),
            Err(AppError::InvalidTransaction(msg)) if msg.contains("decimal places")
        ));
    }

    #[tokio::test]
    async fn credit_is_recorded_and_listed() {
        let id = Uuid::new_v4();
        let accounts = Arc::new(StubAccounts::with_account(id, dec!(1000)));
        let service = service(accounts.clone());

        let tx = service
            .record(id, dec!(200), "Test Credit".into(), TransactionType::Credit)
            .await
            .unwrap();

        assert_eq!(tx.amount, dec!(200));
        assert_eq!(tx.transaction_type, TransactionType::Credit);
        assert_eq!(tx.account_id, id);
        assert!(tx.transaction_id.starts_with("tx-"));
        assert_eq!(accounts.balance(id), dec!(1200));

        let listed = service.list(id).await.unwrap();
        assert_eq!(listed, vec![tx]);
    }

    #[tokio::test]
    async fn debit_sends_negative_delta_and_keeps_positive_amount() {
        let id = Uuid::new_v4();
        let accounts = Arc::new(StubAccounts::with_account(id, dec!(1000)));
        let service = service(accounts.clone());

        let tx = service
            .record(id, dec!(150), "Test Debit".into(), TransactionType::Debit)
            .await
            .unwrap();

        assert_eq!(tx.amount, dec!(150));
        assert_eq!(tx.transaction_type, TransactionType::Debit);
        assert_eq!(accounts.balance(id), dec!(850));
        assert!(accounts.calls().contains(&format!("adjust {id} -150")));
    }

    #[tokio::test]
    async fn debit_of_entire_balance_is_allowed() {
        let id = Uuid::new_v4();
        let accounts = Arc::new(StubAccounts::with_account(id, dec!(75.50)));
        let service = service(accounts.clone());

        service
            .record(id, dec!(75.50), "Everything".into(), TransactionType::Debit)
            .await
            .unwrap();

        assert_eq!(accounts.balance(id), dec!(0));
    }

    #[tokio::test]
    async fn debit_over_balance_is_refused_before_adjusting() {
        let id = Uuid::new_v4();
        let accounts = Arc::new(StubAccounts::with_account(id, dec!(1000)));
        let service = service(accounts.clone());

        let err = service
            .record(id, dec!(1100), "Excessive Debit".into(), TransactionType::Debit)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InsufficientFunds(_)));
        assert_eq!(accounts.calls(), vec![format!("get {id}")]);
        assert_eq!(accounts.balance(id), dec!(1000));
        assert!(service.list(id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn upstream_refusal_is_insufficient_funds() {
        let id = Uuid::new_v4();
        let accounts = Arc::new(StubAccounts {
            refuse_debits: true,
            ..StubAccounts::with_account(id, dec!(1000))
        });
        let service = service(accounts.clone());

        let err = service
            .record(id, dec!(10), "Raced".into(), TransactionType::Debit)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InsufficientFunds(_)));
        assert!(service.list(id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_amount_makes_no_external_call() {
        let id = Uuid::new_v4();
        let accounts = Arc::new(StubAccounts::with_account(id, dec!(1000)));
        let service = service(accounts.clone());

        for amount in [dec!(0), dec!(-50), dec!(1.001)] {
            let err = service
                .record(id, amount, "Bad".into(), TransactionType::Credit)
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::InvalidTransaction(_)));
        }

        assert!(accounts.calls().is_empty());
    }

    #[tokio::test]
    async fn unknown_account_is_not_found() {
        let accounts = Arc::new(StubAccounts::default());
        let service = service(accounts.clone());
        let missing = Uuid::new_v4();

        let err = service
            .record(missing, dec!(10), "x".into(), TransactionType::Credit)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AccountNotFound(id) if id == missing));

        let err = service.list(missing).await.unwrap_err();
        assert!(matches!(err, AppError::AccountNotFound(_)));
    }

    #[tokio::test]
    async fn existing_account_without_history_lists_empty() {
        let id = Uuid::new_v4();
        let service = service(Arc::new(StubAccounts::with_account(id, dec!(5))));

        assert!(service.list(id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn multiple_transactions_keep_order() {
        let id = Uuid::new_v4();
        let accounts = Arc::new(StubAccounts::with_account(id, dec!(1000)));
        let service = service(accounts.clone());

        service
            .record(id, dec!(500), "Credit 1".into(), TransactionType::Credit)
            .await
            .unwrap();
        service
            .record(id, dec!(200), "Debit 1".into(), TransactionType::Debit)
            .await
            .unwrap();
        service
            .record(id, dec!(300), "Credit 2".into(), TransactionType::Credit)
            .await
            .unwrap();

        let descriptions: Vec<_> = service
            .list(id)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.description)
            .collect();
        assert_eq!(descriptions, vec!["Credit 1", "Debit 1", "Credit 2"]);
        assert_eq!(accounts.balance(id), dec!(1600));
    }

    #[tokio::test]
    async fn store_failure_after_upstream_update_is_internal() {
        let id = Uuid::new_v4();
        let accounts = Arc::new(StubAccounts::with_account(id, dec!(100)));
        let service = TransactionService::new(accounts.clone(), Arc::new(BrokenStore));

        let err = service
            .record(id, dec!(40), "Lost".into(), TransactionType::Credit)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Internal(_)));
        // The upstream change is not rolled back.
        assert_eq!(accounts.balance(id), dec!(140));
    }

    #[tokio::test]
    async fn health_delegates_to_accounts() {
        let up = service(Arc::new(StubAccounts {
            healthy: true,
            ..Default::default()
        }));
        let down = service(Arc::new(StubAccounts::default()));

        assert!(up.accounts_healthy().await);
        assert!(!down.accounts_healthy().await);
    }
}
