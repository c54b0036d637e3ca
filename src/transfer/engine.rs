//! The transfer engine
//!
//! Orchestrates validation, the idempotency fast path, canonical wallet
//! locking, the funds check, and the atomic write of the paired ledger
//! entries. All three flows (topup, bonus, spend) run through this one
//! code path.

use std::time::Duration;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::asset::AssetRegistry;
use crate::db::Database;
use crate::idempotency::{IdempotencyRecord, IdempotencyStore, MAX_KEY_LEN, NewIdempotencyRecord, hash_request};
use crate::ledger::{Direction, LedgerStore, NewLedgerEntry};
use crate::transaction::{NewTransaction, TransactionStore};
use crate::wallet::WalletRegistry;

use super::error::TransferError;
use super::types::{TransferCommand, TransferFlow, TransferOutcome, TransferResult};

/// Transient conflicts are retried up to this many attempts
const MAX_ATTEMPTS: u32 = 3;
/// Linear backoff unit between attempts
const RETRY_BACKOFF: Duration = Duration::from_millis(100);

/// HTTP-shaped status recorded on fresh idempotency records
const STATUS_CREATED: i16 = 201;

/// Double-entry transfer engine over a shared connection pool.
///
/// Safe to invoke from many concurrent callers; the only shared state is
/// the pool handle injected at construction.
pub struct TransferEngine {
    db: Database,
}

impl TransferEngine {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Execute one transfer.
    ///
    /// Returns the committed result, or the cached result of an earlier
    /// commit when the idempotency key has already been used with an
    /// identical request.
    pub async fn execute(
        &self,
        flow: TransferFlow,
        cmd: TransferCommand,
    ) -> Result<TransferOutcome, TransferError> {
        // Cheap local rejection before any storage round-trip
        validate(&cmd)?;

        let request_hash = hash_request(cmd.asset_type_id, cmd.amount, &cmd.reference);

        // Optimistic idempotency read outside the transactional scope.
        // A hit resolves the call without touching the ledger.
        if let Some(record) =
            IdempotencyStore::lookup(self.db.pool(), &cmd.idempotency_key).await?
        {
            tracing::info!(
                key = %cmd.idempotency_key,
                endpoint = %cmd.endpoint,
                "Idempotency cache hit"
            );
            return cached_outcome(&record, &request_hash);
        }

        // Resolve and validate the asset
        let asset = AssetRegistry::get_by_id(self.db.pool(), cmd.asset_type_id)
            .await?
            .ok_or_else(|| {
                TransferError::NotFound(format!("Asset type {} not found", cmd.asset_type_id))
            })?;
        if !asset.active {
            return Err(TransferError::BadRequest(format!(
                "Asset {} is inactive",
                asset.symbol
            )));
        }

        // Resolve the system counterpart of this flow
        let system_ref = flow.system_owner_ref();
        let system_wallet = WalletRegistry::get_system(self.db.pool(), system_ref)
            .await?
            .ok_or_else(|| {
                TransferError::NotFound(format!("System wallet {} not found", system_ref))
            })?;

        let (from_id, to_id) = if flow.debits_caller() {
            (cmd.wallet_id, system_wallet.wallet_id)
        } else {
            (system_wallet.wallet_id, cmd.wallet_id)
        };

        // Transactional scope with bounded retry on transient conflicts
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self
                .run_scope(flow, &cmd, &asset.symbol, from_id, to_id, &request_hash)
                .await
            {
                Err(err) if err.is_transient() && attempt < MAX_ATTEMPTS => {
                    tracing::warn!(
                        attempt,
                        error = %err,
                        "Transfer hit transient storage conflict, retrying"
                    );
                    tokio::time::sleep(RETRY_BACKOFF * attempt).await;
                }
                outcome => return outcome,
            }
        }
    }

    /// One attempt of the transactional scope: lock, check, write, commit.
    ///
    /// Any early return rolls the scope back (the transaction is dropped
    /// uncommitted), so a failed attempt leaves no entries behind.
    async fn run_scope(
        &self,
        flow: TransferFlow,
        cmd: &TransferCommand,
        asset_symbol: &str,
        from_id: Uuid,
        to_id: Uuid,
        request_hash: &str,
    ) -> Result<TransferOutcome, TransferError> {
        let mut tx = self.db.pool().begin().await?;

        // Canonical lock: both wallets, ascending id order, dedup'd
        let wallets = WalletRegistry::lock_wallets(&mut tx, &[from_id, to_id]).await?;
        for id in [from_id, to_id] {
            let wallet = wallets
                .get(&id)
                .ok_or_else(|| TransferError::NotFound(format!("Wallet {} not found", id)))?;
            if !wallet.active {
                return Err(TransferError::BadRequest(format!(
                    "Wallet {} is inactive",
                    id
                )));
            }
        }

        // Funds check for spend only, decided on the locked balance.
        // System wallets are exempt: treasury and bonus pool go negative
        // as the conservation counterparts of user balances.
        if flow.debits_caller() {
            let available =
                LedgerStore::balance_for_asset(&mut tx, from_id, cmd.asset_type_id).await?;
            if available < cmd.amount {
                return Err(TransferError::Unprocessable(format!(
                    "Insufficient balance: available {}, requested {}",
                    available, cmd.amount
                )));
            }
        }

        // Transaction header
        let header = TransactionStore::insert(
            &mut tx,
            &NewTransaction {
                tx_type: flow.kind(),
                reference: cmd.reference.clone(),
                initiated_by: cmd
                    .initiated_by
                    .clone()
                    .unwrap_or_else(|| "system".to_string()),
                metadata: cmd.metadata.clone(),
            },
        )
        .await?;

        // Paired entries: debit the source, then credit the destination.
        // Both become visible atomically at commit.
        LedgerStore::insert_entry(
            &mut tx,
            &NewLedgerEntry {
                transaction_id: header.transaction_id,
                wallet_id: from_id,
                asset_type_id: cmd.asset_type_id,
                direction: Direction::Debit,
                amount: cmd.amount,
            },
        )
        .await?;
        LedgerStore::insert_entry(
            &mut tx,
            &NewLedgerEntry {
                transaction_id: header.transaction_id,
                wallet_id: to_id,
                asset_type_id: cmd.asset_type_id,
                direction: Direction::Credit,
                amount: cmd.amount,
            },
        )
        .await?;

        let result = TransferResult {
            transaction_id: header.transaction_id,
            tx_type: header.tx_type,
            reference: header.reference.clone(),
            asset_type_id: cmd.asset_type_id,
            asset_symbol: asset_symbol.to_string(),
            amount: cmd.amount,
            from_wallet_id: from_id,
            to_wallet_id: to_id,
            created_at: header.created_at,
        };

        // The idempotency record rides in the same scope, so "transfer
        // done" and "idempotency remembered" cannot diverge on a crash.
        let owned = IdempotencyStore::claim(
            &mut tx,
            &NewIdempotencyRecord {
                key: cmd.idempotency_key.clone(),
                endpoint: cmd.endpoint.clone(),
                request_hash: request_hash.to_string(),
                response_status: STATUS_CREATED,
                response_body: serde_json::to_value(&result)?,
                transaction_id: Some(header.transaction_id),
            },
        )
        .await?;

        if !owned {
            // Lost the key race: a concurrent writer committed this key
            // between our optimistic read and now. Discard our entries
            // and resolve against the winner's record.
            tx.rollback().await?;

            let existing = IdempotencyStore::lookup(self.db.pool(), &cmd.idempotency_key)
                .await?
                .ok_or_else(|| {
                    TransferError::Conflict(format!(
                        "Idempotency key {} is contended",
                        cmd.idempotency_key
                    ))
                })?;
            return cached_outcome(&existing, request_hash);
        }

        tx.commit().await?;

        tracing::info!(
            transaction_id = %result.transaction_id,
            tx_type = %result.tx_type,
            amount = %result.amount,
            from = %from_id,
            to = %to_id,
            "Transfer committed"
        );

        Ok(TransferOutcome {
            data: result,
            from_cache: false,
        })
    }
}

/// Resolve a cache hit: identical request replays the stored response,
/// conflicting reuse of the key is rejected.
fn cached_outcome(
    record: &IdempotencyRecord,
    request_hash: &str,
) -> Result<TransferOutcome, TransferError> {
    if record.request_hash.trim() != request_hash {
        return Err(TransferError::Conflict(format!(
            "Idempotency key {} was already used with a different request",
            record.key
        )));
    }

    let data: TransferResult = serde_json::from_value(record.response_body.clone())?;
    Ok(TransferOutcome {
        data,
        from_cache: true,
    })
}

/// Local input validation, applied before any storage call
fn validate(cmd: &TransferCommand) -> Result<(), TransferError> {
    if cmd.amount <= Decimal::ZERO {
        return Err(TransferError::BadRequest(
            "Amount must be positive".to_string(),
        ));
    }
    if cmd.reference.is_empty() {
        return Err(TransferError::BadRequest(
            "Reference must not be empty".to_string(),
        ));
    }
    if cmd.idempotency_key.is_empty() {
        return Err(TransferError::BadRequest(
            "Idempotency key must not be empty".to_string(),
        ));
    }
    if cmd.idempotency_key.len() > MAX_KEY_LEN {
        return Err(TransferError::BadRequest(format!(
            "Idempotency key exceeds {} characters",
            MAX_KEY_LEN
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(amount: Decimal, reference: &str, key: &str) -> TransferCommand {
        TransferCommand {
            wallet_id: Uuid::from_u128(1),
            asset_type_id: Uuid::from_u128(2),
            amount,
            reference: reference.to_string(),
            initiated_by: None,
            metadata: None,
            idempotency_key: key.to_string(),
            endpoint: "wallet.topup".to_string(),
        }
    }

    #[test]
    fn test_validate_accepts_well_formed_command() {
        assert!(validate(&command(Decimal::from(500), "PAY-1", "k1")).is_ok());
    }

    #[test]
    fn test_validate_rejects_non_positive_amounts() {
        assert!(matches!(
            validate(&command(Decimal::ZERO, "PAY-1", "k1")),
            Err(TransferError::BadRequest(_))
        ));
        assert!(matches!(
            validate(&command(Decimal::from(-5), "PAY-1", "k1")),
            Err(TransferError::BadRequest(_))
        ));
    }

    #[test]
    fn test_validate_rejects_empty_reference() {
        assert!(matches!(
            validate(&command(Decimal::from(1), "", "k1")),
            Err(TransferError::BadRequest(_))
        ));
    }

    #[test]
    fn test_validate_key_length_boundary() {
        let max_key = "k".repeat(255);
        assert!(validate(&command(Decimal::from(1), "PAY-1", &max_key)).is_ok());

        let long_key = "k".repeat(256);
        assert!(matches!(
            validate(&command(Decimal::from(1), "PAY-1", &long_key)),
            Err(TransferError::BadRequest(_))
        ));

        assert!(matches!(
            validate(&command(Decimal::from(1), "PAY-1", "")),
            Err(TransferError::BadRequest(_))
        ));
    }

    #[test]
    fn test_cached_outcome_replays_identical_request() {
        let result = TransferResult {
            transaction_id: Uuid::from_u128(10),
            tx_type: crate::transaction::TransactionKind::Topup,
            reference: "PAY-1".to_string(),
            asset_type_id: Uuid::from_u128(2),
            asset_symbol: "GLD".to_string(),
            amount: Decimal::from(500),
            from_wallet_id: Uuid::from_u128(3),
            to_wallet_id: Uuid::from_u128(1),
            created_at: chrono::Utc::now(),
        };
        let record = IdempotencyRecord {
            key: "k1".to_string(),
            endpoint: "wallet.topup".to_string(),
            request_hash: "abc123".to_string(),
            response_status: 201,
            response_body: serde_json::to_value(&result).unwrap(),
            transaction_id: Some(result.transaction_id),
            expires_at: chrono::Utc::now(),
            created_at: chrono::Utc::now(),
        };

        let outcome = cached_outcome(&record, "abc123").unwrap();
        assert!(outcome.from_cache);
        assert_eq!(outcome.data.transaction_id, result.transaction_id);
        assert_eq!(outcome.data.amount, result.amount);
    }

    #[test]
    fn test_cached_outcome_rejects_different_hash() {
        let record = IdempotencyRecord {
            key: "k1".to_string(),
            endpoint: "wallet.topup".to_string(),
            request_hash: "abc123".to_string(),
            response_status: 201,
            response_body: serde_json::json!({}),
            transaction_id: None,
            expires_at: chrono::Utc::now(),
            created_at: chrono::Utc::now(),
        };

        assert!(matches!(
            cached_outcome(&record, "def456"),
            Err(TransferError::Conflict(_))
        ));
    }
}
