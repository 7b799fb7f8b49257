//! Router construction and shared handler state.

use axum::{
    Router,
    routing::get,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::{
    handlers,
    services::{accounts_client::AccountsApi, transaction_service::TransactionService},
    store::TransactionStore,
};

/// State shared by all handlers via `State` extraction.
#[derive(Clone)]
pub struct AppState {
    pub transactions: Arc<TransactionService>,
}

impl AppState {
    pub fn new(accounts: Arc<dyn AccountsApi>, store: Arc<dyn TransactionStore>) -> Self {
        Self {
            transactions: Arc::new(TransactionService::new(accounts, store)),
        }
    }
}

/// Build the HTTP router.
///
/// # Routes
///
/// - `GET|HEAD /health` - service and Accounts service health
/// - `GET /accounts/{account_id}/transactions` - list transactions
/// - `POST /accounts/{account_id}/transactions` - record a transaction
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/health",
            get(handlers::health::health_check).head(handlers::health::health_check_head),
        )
        .route(
            "/accounts/{account_id}/transactions",
            get(handlers::transactions::list_transactions)
                .post(handlers::transactions::create_transaction),
        )
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
