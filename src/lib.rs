//! wallet-ledger - Closed-Loop Virtual-Currency Wallet Service
//!
//! A double-entry ledger transfer engine with banking-core guarantees:
//! no phantom gains, no double-charges under retry, no deadlocks under
//! concurrent transfers, no stored-balance drift.
//!
//! # Modules
//!
//! - [`asset`] - Asset type registry
//! - [`wallet`] - Wallet registry and canonical lock acquisition
//! - [`ledger`] - Immutable entries, derived balances, history
//! - [`transaction`] - Transaction headers
//! - [`idempotency`] - Canonical request hashing and cached outcomes
//! - [`transfer`] - The transfer engine (the single balance-mutating path)
//! - [`gateway`] - HTTP transport
//! - [`db`] - Connection pool and schema bootstrap

pub mod config;
pub mod db;
pub mod logging;

// Domain components
pub mod asset;
pub mod idempotency;
pub mod ledger;
pub mod transaction;
pub mod transfer;
pub mod wallet;

// Transport
pub mod gateway;

// Convenient re-exports at crate root
pub use db::Database;
pub use transfer::{TransferCommand, TransferEngine, TransferError, TransferFlow};
