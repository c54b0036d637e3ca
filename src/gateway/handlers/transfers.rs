//! Write handlers: topup, bonus and spend flows
//!
//! All three deserialize the same body, require an `Idempotency-Key`
//! header and funnel into the transfer engine. Fresh commits answer 201,
//! idempotent replays 200.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::transfer::{TransferCommand, TransferFlow, TransferResult};

use super::super::state::AppState;
use super::super::types::{ApiError, ApiResponse, ApiResult};

const IDEMPOTENCY_HEADER: &str = "Idempotency-Key";

/// Write request body shared by all three flows
#[derive(Debug, Deserialize, ToSchema)]
pub struct TransferBody {
    pub asset_type_id: Uuid,
    /// Amount as a decimal string to avoid float precision issues in JSON
    #[schema(example = "500")]
    pub amount: String,
    /// Non-empty business reference, e.g. a payment or order id
    pub reference: String,
    pub initiated_by: Option<String>,
    /// Free-form structured payload, stored opaquely
    pub metadata: Option<serde_json::Value>,
}

/// Credit a wallet from the treasury
///
/// POST /api/v1/wallets/{wallet_id}/topup
#[utoipa::path(
    post,
    path = "/api/v1/wallets/{wallet_id}/topup",
    params(
        ("wallet_id" = Uuid, Path, description = "Destination wallet"),
        ("Idempotency-Key" = String, Header, description = "Caller-supplied write intent token, <= 255 chars")
    ),
    request_body = TransferBody,
    responses(
        (status = 201, description = "Transfer committed", body = TransferResult, content_type = "application/json"),
        (status = 200, description = "Idempotent replay of an earlier commit"),
        (status = 400, description = "Invalid parameters or inactive asset/wallet"),
        (status = 404, description = "Wallet or asset not found"),
        (status = 409, description = "Idempotency key reused with a different request"),
        (status = 503, description = "Storage contention or timeout, retry later")
    ),
    tag = "Transfers"
)]
pub async fn topup(
    State(state): State<Arc<AppState>>,
    Path(wallet_id): Path<Uuid>,
    headers: HeaderMap,
    Json(body): Json<TransferBody>,
) -> ApiResult<TransferResult> {
    run_transfer(state, TransferFlow::Topup, "wallet.topup", wallet_id, headers, body).await
}

/// Credit a wallet from the bonus pool
///
/// POST /api/v1/wallets/{wallet_id}/bonus
#[utoipa::path(
    post,
    path = "/api/v1/wallets/{wallet_id}/bonus",
    params(
        ("wallet_id" = Uuid, Path, description = "Destination wallet"),
        ("Idempotency-Key" = String, Header, description = "Caller-supplied write intent token, <= 255 chars")
    ),
    request_body = TransferBody,
    responses(
        (status = 201, description = "Transfer committed", body = TransferResult, content_type = "application/json"),
        (status = 200, description = "Idempotent replay of an earlier commit"),
        (status = 400, description = "Invalid parameters or inactive asset/wallet"),
        (status = 404, description = "Wallet or asset not found"),
        (status = 409, description = "Idempotency key reused with a different request"),
        (status = 503, description = "Storage contention or timeout, retry later")
    ),
    tag = "Transfers"
)]
pub async fn bonus(
    State(state): State<Arc<AppState>>,
    Path(wallet_id): Path<Uuid>,
    headers: HeaderMap,
    Json(body): Json<TransferBody>,
) -> ApiResult<TransferResult> {
    run_transfer(state, TransferFlow::Bonus, "wallet.bonus", wallet_id, headers, body).await
}

/// Debit a wallet into revenue
///
/// POST /api/v1/wallets/{wallet_id}/spend
#[utoipa::path(
    post,
    path = "/api/v1/wallets/{wallet_id}/spend",
    params(
        ("wallet_id" = Uuid, Path, description = "Source wallet"),
        ("Idempotency-Key" = String, Header, description = "Caller-supplied write intent token, <= 255 chars")
    ),
    request_body = TransferBody,
    responses(
        (status = 201, description = "Transfer committed", body = TransferResult, content_type = "application/json"),
        (status = 200, description = "Idempotent replay of an earlier commit"),
        (status = 400, description = "Invalid parameters or inactive asset/wallet"),
        (status = 404, description = "Wallet or asset not found"),
        (status = 409, description = "Idempotency key reused with a different request"),
        (status = 422, description = "Insufficient balance"),
        (status = 503, description = "Storage contention or timeout, retry later")
    ),
    tag = "Transfers"
)]
pub async fn spend(
    State(state): State<Arc<AppState>>,
    Path(wallet_id): Path<Uuid>,
    headers: HeaderMap,
    Json(body): Json<TransferBody>,
) -> ApiResult<TransferResult> {
    run_transfer(state, TransferFlow::Spend, "wallet.spend", wallet_id, headers, body).await
}

async fn run_transfer(
    state: Arc<AppState>,
    flow: TransferFlow,
    endpoint: &str,
    wallet_id: Uuid,
    headers: HeaderMap,
    body: TransferBody,
) -> ApiResult<TransferResult> {
    let idempotency_key = match headers
        .get(IDEMPOTENCY_HEADER)
        .and_then(|v| v.to_str().ok())
    {
        Some(key) => key.to_string(),
        None => {
            return ApiError::bad_request(format!("Missing {} header", IDEMPOTENCY_HEADER))
                .into_err();
        }
    };

    // Reject non-numeric amounts here; positivity is the engine's check
    let amount = match Decimal::from_str(body.amount.trim()) {
        Ok(amount) => amount,
        Err(_) => return ApiError::bad_request("Invalid amount format").into_err(),
    };

    let cmd = TransferCommand {
        wallet_id,
        asset_type_id: body.asset_type_id,
        amount,
        reference: body.reference,
        initiated_by: body.initiated_by,
        metadata: body.metadata,
        idempotency_key,
        endpoint: endpoint.to_string(),
    };

    match state.engine.execute(flow, cmd).await {
        Ok(outcome) => {
            let status = if outcome.from_cache {
                StatusCode::OK
            } else {
                StatusCode::CREATED
            };
            Ok((
                status,
                Json(ApiResponse::committed(outcome.data, outcome.from_cache)),
            ))
        }
        Err(e) => ApiError::from(e).into_err(),
    }
}
