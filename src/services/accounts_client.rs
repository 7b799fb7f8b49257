//! Client for the external Accounts service.
//!
//! The Accounts service is the system of record for balances. This client
//! wraps its HTTP API:
//! - `GET /accounts/{id}` - fetch the current account state
//! - `POST /accounts/{id}/credit` and `POST /accounts/{id}/debit` - move money
//! - `GET /health` - liveness probe
//!
//! Every call uses the configured timeout. Nothing is retried: a failed call
//! fails the request that triggered it.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;
use uuid::Uuid;

use crate::models::account::{AccountSnapshot, BalanceChangeRequest};

/// Errors returned by the Accounts client.
#[derive(Debug, thiserror::Error)]
pub enum AccountsError {
    /// Upstream answered 404.
    #[error("Account does not exist")]
    NotFound,

    /// Upstream refused a debit with `INSUFFICIENT_FUNDS`.
    #[error("{0}")]
    InsufficientFunds(String),

    /// Upstream rejected the request body, or the delta was zero.
    #[error("{0}")]
    BadRequest(String),

    /// Any other non-success status.
    #[error("Account service error ({status}): {message}")]
    Upstream { status: u16, message: String },

    /// Timeout, refused connection or other transport failure.
    #[error("Failed to communicate with account service: {0}")]
    Transport(#[from] reqwest::Error),

    /// A success status with a body that could not be decoded.
    #[error("Invalid response from account service: {0}")]
    InvalidResponse(String),
}

/// Operations this service needs from the Accounts service.
///
/// `HttpAccountsClient` is the production implementation. Tests substitute
/// in-memory fakes.
#[async_trait]
pub trait AccountsApi: Send + Sync {
    /// Fetch the current account state.
    async fn get_account(&self, account_id: Uuid) -> Result<AccountSnapshot, AccountsError>;

    /// Apply a signed balance change: positive credits, negative debits.
    async fn adjust_balance(&self, account_id: Uuid, delta: Decimal) -> Result<(), AccountsError>;

    /// `true` only when the Accounts service answers its health probe with 200.
    async fn check_health(&self) -> bool;
}

/// Error body the Accounts service sends alongside non-success statuses.
#[derive(Debug, Default, Deserialize)]
struct UpstreamError {
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl UpstreamError {
    /// Read the body, tolerating empty or non-JSON payloads.
    async fn read(response: Response) -> Self {
        match response.text().await {
            Ok(text) => serde_json::from_str(&text).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    fn message_or(self, fallback: &str) -> String {
        self.message.unwrap_or_else(|| fallback.to_string())
    }
}

/// reqwest-backed Accounts client.
#[derive(Debug, Clone)]
pub struct HttpAccountsClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpAccountsClient {
    /// Build a client for `base_url` with a per-call `timeout`.
    ///
    /// When `api_key` is set it is sent as a bearer token on every call.
    pub fn new(
        base_url: &str,
        timeout: Duration,
        api_key: Option<String>,
    ) -> Result<Self, AccountsError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));

        match &self.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }
}

#[async_trait]
impl AccountsApi for HttpAccountsClient {
    async fn get_account(&self, account_id: Uuid) -> Result<AccountSnapshot, AccountsError> {
        let response = self
            .request(Method::GET, &format!("/accounts/{account_id}"))
            .send()
            .await
            .inspect_err(|e| tracing::error!("Account lookup for {} failed: {}", account_id, e))?;

        match response.status() {
            StatusCode::OK => response
                .json::<AccountSnapshot>()
                .await
                .map_err(|e| AccountsError::InvalidResponse(e.to_string())),
            StatusCode::NOT_FOUND => Err(AccountsError::NotFound),
            status => {
                let body = UpstreamError::read(response).await;
                tracing::error!("Account service returned {} for {}", status, account_id);
                Err(AccountsError::Upstream {
                    status: status.as_u16(),
                    message: body.message_or("Unknown error"),
                })
            }
        }
    }

    async fn adjust_balance(&self, account_id: Uuid, delta: Decimal) -> Result<(), AccountsError> {
        let (operation, amount) = if delta > Decimal::ZERO {
            ("credit", delta)
        } else if delta < Decimal::ZERO {
            ("debit", -delta)
        } else {
            return Err(AccountsError::BadRequest(
                "Balance change must be non-zero".to_string(),
            ));
        };

        let response = self
            .request(Method::POST, &format!("/accounts/{account_id}/{operation}"))
            .json(&BalanceChangeRequest { amount })
            .send()
            .await
            .inspect_err(|e| tracing::error!("{} of {} failed: {}", operation, account_id, e))?;

        let status = response.status();
        if status == StatusCode::OK {
            if let Ok(updated) = response.json::<AccountSnapshot>().await {
                tracing::debug!("Account {} balance is now {}", account_id, updated.balance);
            }
            return Ok(());
        }

        let body = UpstreamError::read(response).await;
        match status {
            StatusCode::NOT_FOUND => Err(AccountsError::NotFound),
            StatusCode::BAD_REQUEST
                if body.error_code.as_deref() == Some("INSUFFICIENT_FUNDS") =>
            {
                Err(AccountsError::InsufficientFunds(
                    body.message_or("Account balance too low"),
                ))
            }
            StatusCode::BAD_REQUEST => Err(AccountsError::BadRequest(
                body.message_or("Invalid request"),
            )),
            status => {
                tracing::error!("Account service returned {} on {}", status, operation);
                Err(AccountsError::Upstream {
                    status: status.as_u16(),
                    message: body.message_or("Unknown error"),
                })
            }
        }
    }

    async fn check_health(&self) -> bool {
        match self.request(Method::GET, "/health").send().await {
            Ok(response) => response.status() == StatusCode::OK,
            Err(e) => {
                tracing::warn!("Account service health probe failed: {}", e);
                false
            }
        }
    }
}
