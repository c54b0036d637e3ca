//! Asset listing handler

use std::sync::Arc;

use axum::extract::State;

use crate::asset::{AssetRegistry, AssetType};

use super::super::state::AppState;
use super::super::types::{ApiError, ApiResult, ok};

/// List active asset types
///
/// GET /api/v1/assets
#[utoipa::path(
    get,
    path = "/api/v1/assets",
    responses(
        (status = 200, description = "Active assets ordered by name", body = [AssetType], content_type = "application/json")
    ),
    tag = "Assets"
)]
pub async fn list_assets(State(state): State<Arc<AppState>>) -> ApiResult<Vec<AssetType>> {
    match AssetRegistry::list_active(state.db.pool()).await {
        Ok(assets) => ok(assets),
        Err(e) => {
            tracing::error!("Failed to list assets: {}", e);
            ApiError::internal("Internal error").into_err()
        }
    }
}
