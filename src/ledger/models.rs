//! Ledger entry models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::transaction::TransactionKind;

/// Side of a double-entry movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Debit = 1,
    Credit = 2,
}

impl Direction {
    pub fn id(&self) -> i16 {
        *self as i16
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Debit => write!(f, "debit"),
            Direction::Credit => write!(f, "credit"),
        }
    }
}

impl TryFrom<i16> for Direction {
    type Error = String;

    fn try_from(val: i16) -> Result<Self, Self::Error> {
        match val {
            1 => Ok(Direction::Debit),
            2 => Ok(Direction::Credit),
            _ => Err(format!("Invalid ledger direction: {}", val)),
        }
    }
}

/// One immutable half-movement of a transaction.
///
/// Rows are insert-only; no code path updates or deletes them.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct LedgerEntry {
    pub entry_id: Uuid,
    pub transaction_id: Uuid,
    pub wallet_id: Uuid,
    pub asset_type_id: Uuid,
    #[sqlx(try_from = "i16")]
    pub direction: Direction,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for one ledger entry
#[derive(Debug, Clone)]
pub struct NewLedgerEntry {
    pub transaction_id: Uuid,
    pub wallet_id: Uuid,
    pub asset_type_id: Uuid,
    pub direction: Direction,
    pub amount: Decimal,
}

/// Per-asset balance line, derived as SUM(credits) - SUM(debits)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct AssetBalance {
    pub asset_type_id: Uuid,
    pub name: String,
    pub symbol: String,
    pub balance: Decimal,
}

/// History row joined with asset symbol and transaction header
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct EnrichedEntry {
    pub entry_id: Uuid,
    pub transaction_id: Uuid,
    pub asset_type_id: Uuid,
    pub asset_symbol: String,
    #[sqlx(try_from = "i16")]
    pub direction: Direction,
    pub amount: Decimal,
    #[sqlx(try_from = "i16")]
    pub tx_type: TransactionKind,
    pub reference: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_roundtrip() {
        assert_eq!(Direction::try_from(Direction::Debit.id()), Ok(Direction::Debit));
        assert_eq!(Direction::try_from(Direction::Credit.id()), Ok(Direction::Credit));
        assert!(Direction::try_from(0).is_err());
    }

    #[test]
    fn test_direction_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Direction::Debit).unwrap(),
            r#""debit""#
        );
        assert_eq!(
            serde_json::to_string(&Direction::Credit).unwrap(),
            r#""credit""#
        );
    }
}
