//! Transaction storage.
//!
//! Records are kept per account in insertion order. The store is append-only:
//! there is no update, delete, eviction or pagination.
//!
//! `TransactionStore` is the seam for alternative backends. The service ships
//! with `InMemoryTransactionStore`, whose contents live for the lifetime of the
//! process.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::transaction::Transaction;

/// Storage backend failure.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Transaction store unavailable: {0}")]
    Unavailable(String),
}

/// Append-only per-account transaction storage.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Append `transaction` to the end of the account's history.
    async fn append(&self, account_id: Uuid, transaction: Transaction) -> Result<(), StoreError>;

    /// All transactions for the account, oldest first. Unknown accounts yield
    /// an empty list.
    async fn list_for(&self, account_id: Uuid) -> Result<Vec<Transaction>, StoreError>;
}

/// Process-local store guarded by a read/write lock.
#[derive(Debug, Default)]
pub struct InMemoryTransactionStore {
    transactions: RwLock<HashMap<Uuid, Vec<Transaction>>>,
}

impl InMemoryTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn append(&self, account_id: Uuid, transaction: Transaction) -> Result<(), StoreError> {
        self.transactions
            .write()
            .await
            .entry(account_id)
            .or_default()
            .push(transaction);
        Ok(())
    }

    async fn list_for(&self, account_id: Uuid) -> Result<Vec<Transaction>, StoreError> {
        Ok(self
            .transactions
            .read()
            .await
            .get(&account_id)
            .cloned()
            .unwrap_or_default())
    }
}
