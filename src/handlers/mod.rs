//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Extracts path parameters and the JSON body
//! 2. Delegates to the transaction service
//! 3. Returns a JSON response or the error envelope

/// Health check endpoints
pub mod health;
/// Transaction endpoints
pub mod transactions;
