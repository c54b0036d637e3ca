//! Transfer request and result types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::transaction::TransactionKind;
use crate::wallet::system_refs;

/// The three supported flows. Each pairs the caller's wallet with one
/// well-known system wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferFlow {
    /// treasury -> caller wallet
    Topup,
    /// bonus pool -> caller wallet
    Bonus,
    /// caller wallet -> revenue
    Spend,
}

impl TransferFlow {
    pub fn kind(&self) -> TransactionKind {
        match self {
            TransferFlow::Topup => TransactionKind::Topup,
            TransferFlow::Bonus => TransactionKind::Bonus,
            TransferFlow::Spend => TransactionKind::Spend,
        }
    }

    /// Owner ref of the system wallet on the other side of this flow
    pub fn system_owner_ref(&self) -> &'static str {
        match self {
            TransferFlow::Topup => system_refs::TREASURY,
            TransferFlow::Bonus => system_refs::BONUS_POOL,
            TransferFlow::Spend => system_refs::REVENUE,
        }
    }

    /// Whether the caller's wallet is the debited side
    pub fn debits_caller(&self) -> bool {
        matches!(self, TransferFlow::Spend)
    }
}

/// Validated-at-the-edge input to the transfer engine
#[derive(Debug, Clone)]
pub struct TransferCommand {
    pub wallet_id: Uuid,
    pub asset_type_id: Uuid,
    pub amount: Decimal,
    pub reference: String,
    pub initiated_by: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub idempotency_key: String,
    /// Logical operation tag stored on the idempotency record
    pub endpoint: String,
}

/// Committed (or cached) outcome of one transfer
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TransferResult {
    pub transaction_id: Uuid,
    pub tx_type: TransactionKind,
    pub reference: String,
    pub asset_type_id: Uuid,
    pub asset_symbol: String,
    pub amount: Decimal,
    pub from_wallet_id: Uuid,
    pub to_wallet_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Engine response: the result plus whether it was served from the
/// idempotency cache
#[derive(Debug, Clone)]
pub struct TransferOutcome {
    pub data: TransferResult,
    pub from_cache: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flow_system_wallets() {
        assert_eq!(TransferFlow::Topup.system_owner_ref(), "system:treasury");
        assert_eq!(TransferFlow::Bonus.system_owner_ref(), "system:bonus_pool");
        assert_eq!(TransferFlow::Spend.system_owner_ref(), "system:revenue");
    }

    #[test]
    fn test_only_spend_debits_caller() {
        assert!(TransferFlow::Spend.debits_caller());
        assert!(!TransferFlow::Topup.debits_caller());
        assert!(!TransferFlow::Bonus.debits_caller());
    }

    #[test]
    fn test_flow_kind_mapping() {
        assert_eq!(TransferFlow::Topup.kind(), TransactionKind::Topup);
        assert_eq!(TransferFlow::Bonus.kind(), TransactionKind::Bonus);
        assert_eq!(TransferFlow::Spend.kind(), TransactionKind::Spend);
    }
}
