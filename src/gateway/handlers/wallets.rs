//! Wallet read handlers: listing, balance snapshot, entry history

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::ledger::{AssetBalance, EnrichedEntry, LedgerStore};
use crate::wallet::{Wallet, WalletRegistry};

use super::super::state::AppState;
use super::super::types::{ApiError, ApiResult, ok};
use super::helpers::{clamp_limit, clamp_offset};

/// Balance snapshot response data
#[derive(Debug, Serialize, ToSchema)]
pub struct BalanceData {
    pub wallet_id: Uuid,
    pub label: String,
    pub balances: Vec<AssetBalance>,
}

/// Paginated history response data
#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionsData {
    pub wallet_id: Uuid,
    pub label: String,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    pub entries: Vec<EnrichedEntry>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// List all wallets, system wallets first
///
/// GET /api/v1/wallets
#[utoipa::path(
    get,
    path = "/api/v1/wallets",
    responses(
        (status = 200, description = "All wallets", body = [Wallet], content_type = "application/json")
    ),
    tag = "Wallets"
)]
pub async fn list_wallets(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Wallet>> {
    match WalletRegistry::list(state.db.pool()).await {
        Ok(wallets) => ok(wallets),
        Err(e) => {
            tracing::error!("Failed to list wallets: {}", e);
            ApiError::internal("Internal error").into_err()
        }
    }
}

/// Balance snapshot for a wallet
///
/// GET /api/v1/wallets/{wallet_id}/balance
///
/// Non-locking read-committed read; a concurrent commit may or may not
/// be visible. Display only, never used for decisions.
#[utoipa::path(
    get,
    path = "/api/v1/wallets/{wallet_id}/balance",
    params(("wallet_id" = Uuid, Path, description = "Wallet ID")),
    responses(
        (status = 200, description = "Per-asset balances", body = BalanceData, content_type = "application/json"),
        (status = 404, description = "Wallet not found")
    ),
    tag = "Wallets"
)]
pub async fn get_balance(
    State(state): State<Arc<AppState>>,
    Path(wallet_id): Path<Uuid>,
) -> ApiResult<BalanceData> {
    let wallet = resolve_wallet(&state, wallet_id).await?;

    match LedgerStore::balances(state.db.pool(), wallet_id).await {
        Ok(balances) => ok(BalanceData {
            wallet_id,
            label: wallet.label,
            balances,
        }),
        Err(e) => {
            tracing::error!("Failed to read balances for {}: {}", wallet_id, e);
            ApiError::internal("Internal error").into_err()
        }
    }
}

/// Paginated ledger history for a wallet, newest first
///
/// GET /api/v1/wallets/{wallet_id}/transactions?limit&offset
#[utoipa::path(
    get,
    path = "/api/v1/wallets/{wallet_id}/transactions",
    params(
        ("wallet_id" = Uuid, Path, description = "Wallet ID"),
        ("limit" = Option<i64>, Query, description = "Page size, clamped to [1, 100], default 20"),
        ("offset" = Option<i64>, Query, description = "Page offset, >= 0")
    ),
    responses(
        (status = 200, description = "Entry history", body = TransactionsData, content_type = "application/json"),
        (status = 404, description = "Wallet not found")
    ),
    tag = "Wallets"
)]
pub async fn get_transactions(
    State(state): State<Arc<AppState>>,
    Path(wallet_id): Path<Uuid>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<TransactionsData> {
    let wallet = resolve_wallet(&state, wallet_id).await?;

    let limit = clamp_limit(query.limit);
    let offset = clamp_offset(query.offset);

    let total = match LedgerStore::count(state.db.pool(), wallet_id).await {
        Ok(total) => total,
        Err(e) => {
            tracing::error!("Failed to count entries for {}: {}", wallet_id, e);
            return ApiError::internal("Internal error").into_err();
        }
    };

    match LedgerStore::history(state.db.pool(), wallet_id, limit, offset).await {
        Ok(entries) => ok(TransactionsData {
            wallet_id,
            label: wallet.label,
            total,
            limit,
            offset,
            entries,
        }),
        Err(e) => {
            tracing::error!("Failed to read history for {}: {}", wallet_id, e);
            ApiError::internal("Internal error").into_err()
        }
    }
}

async fn resolve_wallet(state: &AppState, wallet_id: Uuid) -> Result<Wallet, ApiError> {
    WalletRegistry::get_by_id(state.db.pool(), wallet_id)
        .await
        .map_err(|e| {
            tracing::error!("Wallet lookup failed for {}: {}", wallet_id, e);
            ApiError::internal("Internal error")
        })?
        .ok_or_else(|| ApiError::not_found(format!("Wallet {} not found", wallet_id)))
}
