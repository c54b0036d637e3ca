//! OpenAPI documentation
//!
//! Generated with utoipa; export with `cargo run --bin export_openapi`.

use utoipa::OpenApi;

use crate::asset::AssetType;
use crate::gateway::handlers::{BalanceData, HealthResponse, TransactionsData, TransferBody};
use crate::ledger::{AssetBalance, Direction, EnrichedEntry};
use crate::transaction::TransactionKind;
use crate::transfer::TransferResult;
use crate::wallet::{OwnerType, Wallet};

/// Main API documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Wallet Ledger API",
        version = "1.0.0",
        description = "Closed-loop virtual-currency wallet service with a double-entry ledger core."
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health::health_check,
        crate::gateway::handlers::assets::list_assets,
        crate::gateway::handlers::wallets::list_wallets,
        crate::gateway::handlers::wallets::get_balance,
        crate::gateway::handlers::wallets::get_transactions,
        crate::gateway::handlers::transfers::topup,
        crate::gateway::handlers::transfers::bonus,
        crate::gateway::handlers::transfers::spend,
    ),
    components(schemas(
        AssetType,
        Wallet,
        OwnerType,
        AssetBalance,
        EnrichedEntry,
        Direction,
        TransactionKind,
        TransferBody,
        TransferResult,
        BalanceData,
        TransactionsData,
        HealthResponse,
    )),
    tags(
        (name = "System", description = "Health and diagnostics"),
        (name = "Assets", description = "Asset type catalog"),
        (name = "Wallets", description = "Wallet reads: balances and history"),
        (name = "Transfers", description = "Idempotent write flows"),
    )
)]
pub struct ApiDoc;
