//! Data models for transactions and the upstream account view.

/// Upstream account snapshot
pub mod account;
/// Transaction record and request types
pub mod transaction;
