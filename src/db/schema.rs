//! Ledger schema bootstrap
//!
//! Creates the five tables and the indices the read/write paths rely on.
//! Seeding of asset types and system wallets happens out of band.

use anyhow::{Context, Result};
use sqlx::PgPool;

/// Initialize the PostgreSQL schema for the wallet database
pub async fn init_schema(pool: &PgPool) -> Result<()> {
    tracing::info!("Initializing wallet schema...");

    for (name, ddl) in [
        ("asset_types", CREATE_ASSET_TYPES),
        ("wallets", CREATE_WALLETS),
        ("transactions", CREATE_TRANSACTIONS),
        ("ledger_entries", CREATE_LEDGER_ENTRIES),
        ("idempotency_keys", CREATE_IDEMPOTENCY_KEYS),
    ] {
        sqlx::query(ddl)
            .execute(pool)
            .await
            .with_context(|| format!("Failed to create table {}", name))?;
    }

    for ddl in CREATE_INDICES {
        sqlx::query(ddl)
            .execute(pool)
            .await
            .context("Failed to create index")?;
    }

    tracing::info!("Wallet schema initialized successfully");
    Ok(())
}

const CREATE_ASSET_TYPES: &str = r#"
CREATE TABLE IF NOT EXISTS asset_types (
    asset_type_id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name          VARCHAR(64) NOT NULL UNIQUE,
    symbol        VARCHAR(10) NOT NULL UNIQUE,
    description   TEXT NOT NULL DEFAULT '',
    active        BOOLEAN NOT NULL DEFAULT TRUE,
    created_at    TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const CREATE_WALLETS: &str = r#"
CREATE TABLE IF NOT EXISTS wallets (
    wallet_id  UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    owner_ref  VARCHAR(128) NOT NULL UNIQUE,
    owner_type SMALLINT NOT NULL,
    label      VARCHAR(128) NOT NULL,
    active     BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const CREATE_TRANSACTIONS: &str = r#"
CREATE TABLE IF NOT EXISTS transactions (
    transaction_id UUID PRIMARY KEY,
    tx_type        SMALLINT NOT NULL,
    reference      VARCHAR(255) NOT NULL CHECK (reference <> ''),
    initiated_by   VARCHAR(128) NOT NULL DEFAULT 'system',
    metadata       JSONB,
    created_at     TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const CREATE_LEDGER_ENTRIES: &str = r#"
CREATE TABLE IF NOT EXISTS ledger_entries (
    entry_id       UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    transaction_id UUID NOT NULL REFERENCES transactions (transaction_id),
    wallet_id      UUID NOT NULL REFERENCES wallets (wallet_id),
    asset_type_id  UUID NOT NULL REFERENCES asset_types (asset_type_id),
    direction      SMALLINT NOT NULL,
    amount         NUMERIC(28, 8) NOT NULL CHECK (amount > 0),
    created_at     TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const CREATE_IDEMPOTENCY_KEYS: &str = r#"
CREATE TABLE IF NOT EXISTS idempotency_keys (
    key             VARCHAR(255) PRIMARY KEY,
    endpoint        VARCHAR(64) NOT NULL,
    request_hash    CHAR(64) NOT NULL,
    response_status SMALLINT NOT NULL,
    response_body   JSONB NOT NULL,
    transaction_id  UUID,
    expires_at      TIMESTAMPTZ NOT NULL,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const CREATE_INDICES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_ledger_wallet_asset ON ledger_entries (wallet_id, asset_type_id)",
    "CREATE INDEX IF NOT EXISTS idx_ledger_transaction ON ledger_entries (transaction_id)",
    "CREATE INDEX IF NOT EXISTS idx_ledger_created_at ON ledger_entries (created_at DESC)",
    "CREATE INDEX IF NOT EXISTS idx_transactions_reference ON transactions (reference)",
    "CREATE INDEX IF NOT EXISTS idx_idempotency_expires ON idempotency_keys (expires_at)",
];
