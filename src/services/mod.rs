//! Business logic services.
//!
//! Services keep the transaction workflow and the Accounts integration out of
//! the HTTP handlers.

pub mod accounts_client;
pub mod transaction_service;
