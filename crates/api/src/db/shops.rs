//! Shop repository for database operations.

use sqlx::SqlitePool;

use nearshop_core::{ShopId, VendorId};

use super::RepositoryError;
use crate::models::{Shop, ShopDraft};

/// Repository for shop database operations.
pub struct ShopRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ShopRepository<'a> {
    /// Create a new shop repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a shop owned by `vendor_id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails (including a
    /// foreign key violation for an unknown vendor).
    pub async fn create(
        &self,
        vendor_id: VendorId,
        draft: &ShopDraft,
    ) -> Result<Shop, RepositoryError> {
        let shop = sqlx::query_as::<_, Shop>(
            r"
            INSERT INTO shops (name, owner, business_type, latitude, longitude, vendor_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, owner, business_type, latitude, longitude, vendor_id
            ",
        )
        .bind(&draft.name)
        .bind(&draft.owner)
        .bind(&draft.business_type)
        .bind(draft.location.latitude())
        .bind(draft.location.longitude())
        .bind(vendor_id)
        .fetch_one(self.pool)
        .await?;

        Ok(shop)
    }

    /// Get a shop by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ShopId) -> Result<Option<Shop>, RepositoryError> {
        let shop = sqlx::query_as::<_, Shop>(
            r"
            SELECT id, name, owner, business_type, latitude, longitude, vendor_id
            FROM shops
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(shop)
    }

    /// List shops ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Shop>, RepositoryError> {
        let shops = sqlx::query_as::<_, Shop>(
            r"
            SELECT id, name, owner, business_type, latitude, longitude, vendor_id
            FROM shops
            ORDER BY id
            LIMIT $1 OFFSET $2
            ",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        Ok(shops)
    }

    /// All shops whose latitude lies in `[min_latitude, max_latitude]`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn in_latitude_band(
        &self,
        min_latitude: f64,
        max_latitude: f64,
    ) -> Result<Vec<Shop>, RepositoryError> {
        let shops = sqlx::query_as::<_, Shop>(
            r"
            SELECT id, name, owner, business_type, latitude, longitude, vendor_id
            FROM shops
            WHERE latitude BETWEEN $1 AND $2
            ",
        )
        .bind(min_latitude)
        .bind(max_latitude)
        .fetch_all(self.pool)
        .await?;

        Ok(shops)
    }

    /// Overwrite every writable field of a shop.
    ///
    /// The owning vendor is not writable. Returns `None` if no shop has `id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn replace(
        &self,
        id: ShopId,
        draft: &ShopDraft,
    ) -> Result<Option<Shop>, RepositoryError> {
        let shop = sqlx::query_as::<_, Shop>(
            r"
            UPDATE shops
            SET name = $1,
                owner = $2,
                business_type = $3,
                latitude = $4,
                longitude = $5
            WHERE id = $6
            RETURNING id, name, owner, business_type, latitude, longitude, vendor_id
            ",
        )
        .bind(&draft.name)
        .bind(&draft.owner)
        .bind(&draft.business_type)
        .bind(draft.location.latitude())
        .bind(draft.location.longitude())
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(shop)
    }

    /// Delete a shop by ID.
    ///
    /// # Returns
    ///
    /// Returns `true` if the shop was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ShopId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM shops
            WHERE id = $1
            ",
        )
        .bind(id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
