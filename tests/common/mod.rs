//! Common test utilities

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower::util::ServiceExt;
use transactions_service::{
    AppState, build_router,
    models::account::AccountSnapshot,
    services::accounts_client::{AccountsApi, AccountsError},
    store::InMemoryTransactionStore,
};
use uuid::Uuid;

/// In-memory Accounts service that counts calls by kind.
#[derive(Default)]
pub struct FakeAccounts {
    balances: Mutex<HashMap<Uuid, Decimal>>,
    pub get_calls: Mutex<Vec<Uuid>>,
    pub credit_calls: Mutex<Vec<(Uuid, Decimal)>>,
    pub debit_calls: Mutex<Vec<(Uuid, Decimal)>>,
    healthy: Mutex<bool>,
    unreachable: Mutex<bool>,
}

impl FakeAccounts {
    pub fn new() -> Arc<Self> {
        let fake = Self::default();
        *fake.healthy.lock().unwrap() = true;
        Arc::new(fake)
    }

    pub fn seed(&self, account_id: Uuid, balance: Decimal) {
        self.balances.lock().unwrap().insert(account_id, balance);
    }

    pub fn balance(&self, account_id: Uuid) -> Decimal {
        self.balances.lock().unwrap()[&account_id]
    }

    pub fn set_healthy(&self, healthy: bool) {
        *self.healthy.lock().unwrap() = healthy;
    }

    /// Make every call fail as if the connection was refused.
    pub fn set_unreachable(&self, unreachable: bool) {
        *self.unreachable.lock().unwrap() = unreachable;
    }

    pub fn get_count(&self) -> usize {
        self.get_calls.lock().unwrap().len()
    }

    pub fn credits(&self) -> Vec<(Uuid, Decimal)> {
        self.credit_calls.lock().unwrap().clone()
    }

    pub fn debits(&self) -> Vec<(Uuid, Decimal)> {
        self.debit_calls.lock().unwrap().clone()
    }

    fn check_reachable(&self) -> Result<(), AccountsError> {
        if *self.unreachable.lock().unwrap() {
            return Err(AccountsError::Upstream {
                status: 503,
                message: "Failed to communicate with account service".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl AccountsApi for FakeAccounts {
    async fn get_account(&self, account_id: Uuid) -> Result<AccountSnapshot, AccountsError> {
        self.get_calls.lock().unwrap().push(account_id);
        self.check_reachable()?;

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

    async fn adjust_balance(&self, account_id: Uuid, delta: Decimal) -> Result<(), AccountsError> {
        if delta > Decimal::ZERO {
            self.credit_calls.lock().unwrap().push((account_id, delta));
        } else {
            self.debit_calls.lock().unwrap().push((account_id, -delta));
        }
        self.check_reachable()?;

        let mut balances = self.balances.lock().unwrap();
        let balance = balances.get_mut(&account_id).ok_or(AccountsError::NotFound)?;
        if *balance + delta < Decimal::ZERO {
            return Err(AccountsError::InsufficientFunds(
                "Account balance too low".to_string(),
            ));
        }
        *balance += delta;
        Ok(())
    }

    async fn check_health(&self) -> bool {
        *self.healthy.lock().unwrap()
    }
}

/// Router wired to the fake Accounts service and a fresh in-memory store.
pub fn app(accounts: Arc<FakeAccounts>) -> Router {
    build_router(AppState::new(
        accounts,
        Arc::new(InMemoryTransactionStore::new()),
    ))
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(
        app,
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(
        app,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

pub fn transactions_uri(account_id: Uuid) -> String {
    format!("/accounts/{account_id}/transactions")
}
