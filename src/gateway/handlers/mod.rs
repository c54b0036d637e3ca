pub mod assets;
pub mod health;
pub mod helpers;
pub mod transfers;
pub mod wallets;

pub use assets::list_assets;
pub use health::{HealthResponse, health_check};
pub use transfers::{TransferBody, bonus, spend, topup};
pub use wallets::{BalanceData, TransactionsData, get_balance, get_transactions, list_wallets};
