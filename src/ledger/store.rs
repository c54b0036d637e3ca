//! Ledger persistence: append entries, derive balances, paginate history
//!
//! Balances are never stored. Every read sums `credit - debit` over the
//! entries of a (wallet, asset) pair, so a committed transfer is the only
//! thing that can move a balance.

use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::models::{AssetBalance, Direction, EnrichedEntry, NewLedgerEntry};

/// Ledger operations over the `ledger_entries` table
pub struct LedgerStore;

impl LedgerStore {
    /// Append one immutable entry inside the caller's transactional scope
    pub async fn insert_entry(
        conn: &mut PgConnection,
        entry: &NewLedgerEntry,
    ) -> Result<Uuid, sqlx::Error> {
        let entry_id: Uuid = sqlx::query_scalar(
            r#"INSERT INTO ledger_entries
                   (transaction_id, wallet_id, asset_type_id, direction, amount)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING entry_id"#,
        )
        .bind(entry.transaction_id)
        .bind(entry.wallet_id)
        .bind(entry.asset_type_id)
        .bind(entry.direction.id())
        .bind(entry.amount)
        .fetch_one(conn)
        .await?;

        Ok(entry_id)
    }

    /// Balance snapshot for a wallet, one line per asset with entries.
    ///
    /// Read-committed display read; assets that sum to zero are dropped.
    pub async fn balances(
        pool: &PgPool,
        wallet_id: Uuid,
    ) -> Result<Vec<AssetBalance>, sqlx::Error> {
        let rows: Vec<AssetBalance> = sqlx::query_as(
            r#"SELECT e.asset_type_id, a.name, a.symbol,
                      SUM(CASE WHEN e.direction = $2 THEN e.amount ELSE -e.amount END) AS balance
               FROM ledger_entries e
               JOIN asset_types a ON a.asset_type_id = e.asset_type_id
               WHERE e.wallet_id = $1
               GROUP BY e.asset_type_id, a.name, a.symbol
               HAVING SUM(CASE WHEN e.direction = $2 THEN e.amount ELSE -e.amount END) <> 0
               ORDER BY a.name"#,
        )
        .bind(wallet_id)
        .bind(Direction::Credit.id())
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    /// Balance of one (wallet, asset) pair inside a transactional scope.
    ///
    /// The caller must already hold the row lock on the wallet; this is
    /// the sum the spend funds check decides on. Returns 0 when the pair
    /// has no entries.
    pub async fn balance_for_asset(
        conn: &mut PgConnection,
        wallet_id: Uuid,
        asset_type_id: Uuid,
    ) -> Result<Decimal, sqlx::Error> {
        let balance: Decimal = sqlx::query_scalar(
            r#"SELECT COALESCE(
                   SUM(CASE WHEN direction = $3 THEN amount ELSE -amount END), 0
               )
               FROM ledger_entries
               WHERE wallet_id = $1 AND asset_type_id = $2"#,
        )
        .bind(wallet_id)
        .bind(asset_type_id)
        .bind(Direction::Credit.id())
        .fetch_one(conn)
        .await?;

        Ok(balance)
    }

    /// Paginated entry history for a wallet, newest first
    pub async fn history(
        pool: &PgPool,
        wallet_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<EnrichedEntry>, sqlx::Error> {
        let rows: Vec<EnrichedEntry> = sqlx::query_as(
            r#"SELECT e.entry_id, e.transaction_id, e.asset_type_id,
                      a.symbol AS asset_symbol,
                      e.direction, e.amount,
                      t.tx_type, t.reference,
                      e.created_at
               FROM ledger_entries e
               JOIN asset_types a ON a.asset_type_id = e.asset_type_id
               JOIN transactions t ON t.transaction_id = e.transaction_id
               WHERE e.wallet_id = $1
               ORDER BY e.created_at DESC
               LIMIT $2 OFFSET $3"#,
        )
        .bind(wallet_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    /// Total entry count for a wallet, for pagination metadata
    pub async fn count(pool: &PgPool, wallet_id: Uuid) -> Result<i64, sqlx::Error> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM ledger_entries WHERE wallet_id = $1")
                .bind(wallet_id)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }
}
