//! Asset registry for loading and querying asset types

use super::models::AssetType;
use sqlx::PgPool;
use uuid::Uuid;

/// Asset lookups against the `asset_types` table
pub struct AssetRegistry;

impl AssetRegistry {
    /// Get an asset type by ID, active or not
    pub async fn get_by_id(
        pool: &PgPool,
        asset_type_id: Uuid,
    ) -> Result<Option<AssetType>, sqlx::Error> {
        let row: Option<AssetType> = sqlx::query_as(
            r#"SELECT asset_type_id, name, symbol, description, active, created_at
               FROM asset_types WHERE asset_type_id = $1"#,
        )
        .bind(asset_type_id)
        .fetch_optional(pool)
        .await?;

        Ok(row)
    }

    /// List all active asset types, ordered by name
    pub async fn list_active(pool: &PgPool) -> Result<Vec<AssetType>, sqlx::Error> {
        let rows: Vec<AssetType> = sqlx::query_as(
            r#"SELECT asset_type_id, name, symbol, description, active, created_at
               FROM asset_types WHERE active ORDER BY name"#,
        )
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }
}
