//! Wallets (accounts holding balances across asset types)

pub mod models;
pub mod registry;

pub use models::{OwnerType, Wallet, system_refs};
pub use registry::WalletRegistry;
