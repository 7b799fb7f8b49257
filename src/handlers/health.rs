//! Health check endpoints for service monitoring.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use crate::app::AppState;

/// Health check response.
///
/// `status` is this service's own liveness and is always `UP` when a response
/// is produced. `account_service` reports the Accounts dependency.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub account_service: String,
    pub message: String,
}

impl HealthResponse {
    fn from_dependency(accounts_up: bool) -> (StatusCode, Self) {
        if accounts_up {
            (
                StatusCode::OK,
                Self {
                    status: "UP".to_string(),
                    account_service: "UP".to_string(),
                    message: "All services operational".to_string(),
                },
            )
        } else {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Self {
                    status: "UP".to_string(),
                    account_service: "DOWN".to_string(),
                    message: "Account service not available".to_string(),
                },
            )
        }
    }
}

/// Health check handler.
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "status": "UP",
///   "account_service": "UP",
///   "message": "All services operational"
/// }
/// ```
///
/// # Response (503 Service Unavailable)
///
/// Same shape with `account_service: "DOWN"` when the Accounts service does
/// not answer its own health probe.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let accounts_up = state.transactions.accounts_healthy().await;
    if !accounts_up {
        tracing::warn!("Health check: account service is down");
    }

    let (status, body) = HealthResponse::from_dependency(accounts_up);
    (status, Json(body))
}

/// `HEAD /health`: same status codes as `GET`, without a body.
pub async fn health_check_head(State(state): State<AppState>) -> StatusCode {
    HealthResponse::from_dependency(state.transactions.accounts_healthy().await).0
}
