//! Idempotency record persistence
//!
//! One unexpired row per key. The row is written inside the same
//! transactional scope as the ledger entries it caches, so the cached
//! response becomes visible exactly when the balance movement does.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

/// Maximum accepted idempotency key length
pub const MAX_KEY_LEN: usize = 255;

/// Records expire 24 hours after creation; expired rows are ignored and
/// reclaimed in place on key reuse.
pub const KEY_TTL_HOURS: i32 = 24;

/// Cached outcome of a completed write
#[derive(Debug, Clone, FromRow)]
pub struct IdempotencyRecord {
    pub key: String,
    pub endpoint: String,
    pub request_hash: String,
    pub response_status: i16,
    pub response_body: serde_json::Value,
    pub transaction_id: Option<Uuid>,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for an idempotency record
#[derive(Debug, Clone)]
pub struct NewIdempotencyRecord {
    pub key: String,
    pub endpoint: String,
    pub request_hash: String,
    pub response_status: i16,
    pub response_body: serde_json::Value,
    pub transaction_id: Option<Uuid>,
}

/// Operations over the `idempotency_keys` table
pub struct IdempotencyStore;

impl IdempotencyStore {
    /// Look up an unexpired record for a key. Pure read, no side effects.
    pub async fn lookup(
        pool: &PgPool,
        key: &str,
    ) -> Result<Option<IdempotencyRecord>, sqlx::Error> {
        let row: Option<IdempotencyRecord> = sqlx::query_as(
            r#"SELECT key, endpoint, request_hash, response_status, response_body,
                      transaction_id, expires_at, created_at
               FROM idempotency_keys
               WHERE key = $1 AND expires_at > NOW()"#,
        )
        .bind(key)
        .fetch_optional(pool)
        .await?;

        Ok(row)
    }

    /// Claim a key inside the caller's transactional scope.
    ///
    /// Inserts a fresh row, or takes over an expired one in place. Returns
    /// `false` when a live record already holds the key; the caller then
    /// resolves same-hash replay vs. conflicting reuse and rolls back.
    pub async fn claim(
        conn: &mut PgConnection,
        record: &NewIdempotencyRecord,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"INSERT INTO idempotency_keys
                   (key, endpoint, request_hash, response_status, response_body,
                    transaction_id, expires_at)
               VALUES ($1, $2, $3, $4, $5, $6, NOW() + make_interval(hours => $7))
               ON CONFLICT (key) DO UPDATE SET
                   endpoint        = EXCLUDED.endpoint,
                   request_hash    = EXCLUDED.request_hash,
                   response_status = EXCLUDED.response_status,
                   response_body   = EXCLUDED.response_body,
                   transaction_id  = EXCLUDED.transaction_id,
                   expires_at      = EXCLUDED.expires_at,
                   created_at      = NOW()
               WHERE idempotency_keys.expires_at <= NOW()"#,
        )
        .bind(&record.key)
        .bind(&record.endpoint)
        .bind(&record.request_hash)
        .bind(record.response_status)
        .bind(&record.response_body)
        .bind(record.transaction_id)
        .bind(KEY_TTL_HOURS)
        .execute(conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
