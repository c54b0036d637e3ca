//! Transaction headers (the business-level event behind each entry pair)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// Business flow that produced a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Topup = 1,
    Bonus = 2,
    Spend = 3,
}

impl TransactionKind {
    pub fn id(&self) -> i16 {
        *self as i16
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Topup => write!(f, "topup"),
            TransactionKind::Bonus => write!(f, "bonus"),
            TransactionKind::Spend => write!(f, "spend"),
        }
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "topup" => Ok(TransactionKind::Topup),
            "bonus" => Ok(TransactionKind::Bonus),
            "spend" => Ok(TransactionKind::Spend),
            _ => Err(format!("Invalid transaction kind: {}", s)),
        }
    }
}

impl TryFrom<i16> for TransactionKind {
    type Error = String;

    fn try_from(val: i16) -> Result<Self, Self::Error> {
        match val {
            1 => Ok(TransactionKind::Topup),
            2 => Ok(TransactionKind::Bonus),
            3 => Ok(TransactionKind::Spend),
            _ => Err(format!("Invalid transaction kind: {}", val)),
        }
    }
}

/// Persisted transaction header. Exactly two ledger entries reference it:
/// one debit and one credit of the same amount and asset.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct TransactionRecord {
    pub transaction_id: Uuid,
    #[sqlx(try_from = "i16")]
    pub tx_type: TransactionKind,
    pub reference: String,
    pub initiated_by: String,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a transaction header
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub tx_type: TransactionKind,
    pub reference: String,
    pub initiated_by: String,
    pub metadata: Option<serde_json::Value>,
}

/// Insert operations over the `transactions` table
pub struct TransactionStore;

impl TransactionStore {
    /// Insert a header with a freshly generated id inside the caller's
    /// transactional scope
    pub async fn insert(
        conn: &mut PgConnection,
        tx: &NewTransaction,
    ) -> Result<TransactionRecord, sqlx::Error> {
        let record: TransactionRecord = sqlx::query_as(
            r#"INSERT INTO transactions
                   (transaction_id, tx_type, reference, initiated_by, metadata)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING transaction_id, tx_type, reference, initiated_by, metadata, created_at"#,
        )
        .bind(Uuid::new_v4())
        .bind(tx.tx_type.id())
        .bind(&tx.reference)
        .bind(&tx.initiated_by)
        .bind(&tx.metadata)
        .fetch_one(conn)
        .await?;

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_roundtrip() {
        for kind in [
            TransactionKind::Topup,
            TransactionKind::Bonus,
            TransactionKind::Spend,
        ] {
            assert_eq!(TransactionKind::try_from(kind.id()), Ok(kind));
            assert_eq!(kind.to_string().parse::<TransactionKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_kind_rejects_unknown() {
        assert!(TransactionKind::try_from(0).is_err());
        assert!("refund".parse::<TransactionKind>().is_err());
    }
}
