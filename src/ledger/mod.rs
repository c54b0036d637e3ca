//! Double-entry ledger: immutable entries and derived balances

pub mod models;
pub mod store;

pub use models::{AssetBalance, Direction, EnrichedEntry, LedgerEntry, NewLedgerEntry};
pub use store::LedgerStore;
