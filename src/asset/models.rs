//! Asset type model

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Virtual currency definition (GLD, DIA, ...)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct AssetType {
    pub asset_type_id: Uuid,
    pub name: String,
    /// Ticker-style symbol, at most 10 characters
    pub symbol: String,
    pub description: String,
    /// Deactivated assets are rejected by the transfer engine
    pub active: bool,
    pub created_at: DateTime<Utc>,
}
