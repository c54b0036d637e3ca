//! Wallet lookups and canonical lock acquisition

use std::collections::HashMap;

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::models::{OwnerType, Wallet};

const WALLET_COLUMNS: &str =
    "wallet_id, owner_ref, owner_type, label, active, created_at, updated_at";

/// Wallet repository over the `wallets` table
pub struct WalletRegistry;

impl WalletRegistry {
    /// Get a wallet by ID
    pub async fn get_by_id(
        pool: &PgPool,
        wallet_id: Uuid,
    ) -> Result<Option<Wallet>, sqlx::Error> {
        let row: Option<Wallet> = sqlx::query_as(&format!(
            "SELECT {WALLET_COLUMNS} FROM wallets WHERE wallet_id = $1"
        ))
        .bind(wallet_id)
        .fetch_optional(pool)
        .await?;

        Ok(row)
    }

    /// Get an active system wallet by its well-known owner ref
    pub async fn get_system(
        pool: &PgPool,
        owner_ref: &str,
    ) -> Result<Option<Wallet>, sqlx::Error> {
        let row: Option<Wallet> = sqlx::query_as(&format!(
            "SELECT {WALLET_COLUMNS} FROM wallets
             WHERE owner_ref = $1 AND owner_type = $2 AND active"
        ))
        .bind(owner_ref)
        .bind(OwnerType::System.id())
        .fetch_optional(pool)
        .await?;

        Ok(row)
    }

    /// List all wallets, system wallets first, then by label
    pub async fn list(pool: &PgPool) -> Result<Vec<Wallet>, sqlx::Error> {
        let rows: Vec<Wallet> = sqlx::query_as(&format!(
            "SELECT {WALLET_COLUMNS} FROM wallets ORDER BY owner_type, label"
        ))
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    /// Canonical lock order: distinct ids, ascending.
    ///
    /// Every transfer locks its wallet pair in this order, so two
    /// concurrent transfers over {A, B} and {B, A} always acquire A
    /// before B and cannot deadlock.
    pub fn lock_order(ids: &[Uuid]) -> Vec<Uuid> {
        let mut ordered: Vec<Uuid> = ids.to_vec();
        ordered.sort();
        ordered.dedup();
        ordered
    }

    /// Acquire exclusive row locks on all given wallets.
    ///
    /// Returns the locked wallets keyed by id; a missing id shows up as
    /// an absent key, which the caller must treat as not-found. `ORDER BY`
    /// in the locking query makes PostgreSQL take the row locks in the
    /// canonical ascending order.
    pub async fn lock_wallets(
        conn: &mut PgConnection,
        ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Wallet>, sqlx::Error> {
        let ordered = Self::lock_order(ids);

        let rows: Vec<Wallet> = sqlx::query_as(&format!(
            "SELECT {WALLET_COLUMNS} FROM wallets
             WHERE wallet_id = ANY($1)
             ORDER BY wallet_id
             FOR UPDATE"
        ))
        .bind(&ordered)
        .fetch_all(conn)
        .await?;

        Ok(rows.into_iter().map(|w| (w.wallet_id, w)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_order_sorts_ascending() {
        let a = Uuid::from_u128(1);
        let b = Uuid::from_u128(2);
        let c = Uuid::from_u128(3);

        assert_eq!(WalletRegistry::lock_order(&[c, a, b]), vec![a, b, c]);
        assert_eq!(WalletRegistry::lock_order(&[b, a]), vec![a, b]);
    }

    #[test]
    fn test_lock_order_dedups() {
        let a = Uuid::from_u128(7);
        let b = Uuid::from_u128(9);

        assert_eq!(WalletRegistry::lock_order(&[b, a, b, a]), vec![a, b]);
        assert_eq!(WalletRegistry::lock_order(&[a, a]), vec![a]);
    }

    #[test]
    fn test_lock_order_is_stable_across_permutations() {
        let ids: Vec<Uuid> = (0..6u128).map(Uuid::from_u128).collect();
        let mut shuffled = ids.clone();
        shuffled.reverse();

        assert_eq!(
            WalletRegistry::lock_order(&ids),
            WalletRegistry::lock_order(&shuffled)
        );
    }
}
