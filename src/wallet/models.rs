//! Wallet models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

/// Well-known system wallet owner refs.
///
/// These wallets are the conservation counterparts of user balances:
/// treasury funds top-ups, the bonus pool funds bonuses, revenue
/// absorbs spends. They are seeded out of band and may go negative.
pub mod system_refs {
    pub const TREASURY: &str = "system:treasury";
    pub const BONUS_POOL: &str = "system:bonus_pool";
    pub const REVENUE: &str = "system:revenue";
}

/// Owner class of a wallet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OwnerType {
    System = 1,
    User = 2,
}

impl OwnerType {
    pub fn id(&self) -> i16 {
        *self as i16
    }
}

impl fmt::Display for OwnerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OwnerType::System => write!(f, "system"),
            OwnerType::User => write!(f, "user"),
        }
    }
}

impl TryFrom<i16> for OwnerType {
    type Error = String;

    fn try_from(val: i16) -> Result<Self, Self::Error> {
        match val {
            1 => Ok(OwnerType::System),
            2 => Ok(OwnerType::User),
            _ => Err(format!("Invalid owner type: {}", val)),
        }
    }
}

/// An account capable of holding balances in any asset.
///
/// `active` is the only flag the write path observes; balances are never
/// stored on this row, they are derived from the ledger.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Wallet {
    pub wallet_id: Uuid,
    /// Opaque owner reference, e.g. `user:alice` or `system:treasury`
    pub owner_ref: String,
    #[sqlx(try_from = "i16")]
    pub owner_type: OwnerType,
    pub label: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_type_roundtrip() {
        assert_eq!(OwnerType::try_from(OwnerType::System.id()), Ok(OwnerType::System));
        assert_eq!(OwnerType::try_from(OwnerType::User.id()), Ok(OwnerType::User));
        assert!(OwnerType::try_from(0).is_err());
        assert!(OwnerType::try_from(3).is_err());
    }

    #[test]
    fn test_system_orders_before_user() {
        // list() sorts by owner_type ascending; system wallets come first
        assert!(OwnerType::System.id() < OwnerType::User.id());
    }
}
