//! Transactions Service - Main Application Entry Point
//!
//! A REST API that records credit and debit transactions for accounts and
//! forwards the balance changes to the Accounts service.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Accounts integration**: reqwest client with a per-call timeout
//! - **Storage**: in-memory, append-only per account
//! - **Credentials**: optional AppRole login to Vault for the Accounts API key
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Fetch the Accounts API key from Vault (when configured)
//! 3. Build the Accounts client and the transaction store
//! 4. Build HTTP router with routes and middleware
//! 5. Start server on configured address

use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use transactions_service::{
    AppState, Config, build_router, secrets,
    services::accounts_client::HttpAccountsClient,
    store::InMemoryTransactionStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Reads RUST_LOG, defaults to "info"
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    let api_key = secrets::load_api_key(config.vault_settings()).await?;

    let accounts = HttpAccountsClient::new(
        config.accounts_url()?.as_str(),
        config.accounts_timeout()?,
        api_key,
    )?;
    tracing::info!(
        "Accounts service at {} (timeout {}s)",
        accounts.base_url(),
        config.accounts_service_timeout
    );

    let state = AppState::new(Arc::new(accounts), Arc::new(InMemoryTransactionStore::new()));
    let app = build_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
