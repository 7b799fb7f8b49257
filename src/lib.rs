//! Transactions service library.
//!
//! Records credits and debits for accounts owned by an external Accounts
//! service. Modules are exposed for the binary and for integration tests.

pub mod app;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod secrets;
pub mod services;
pub mod store;

pub use app::{AppState, build_router};
pub use config::Config;
pub use error::{AppError, ErrorCode, ErrorResponse};
