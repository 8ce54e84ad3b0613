//! Shop registry: CRUD with an ownership gate, and proximity search.

use std::cmp::Ordering;

use serde::Deserialize;
use sqlx::SqlitePool;
use thiserror::Error;

use nearshop_core::{GeoPoint, ShopId, VendorId};

use crate::db::{RepositoryError, ShopRepository};
use crate::models::{Shop, ShopDraft};

/// Default page size.
pub const DEFAULT_LIMIT: i64 = 100;

/// Largest page a caller may request.
pub const MAX_LIMIT: i64 = 1000;

/// Errors from shop operations.
#[derive(Debug, Error)]
pub enum ShopError {
    /// No shop with that ID.
    #[error("shop not found")]
    NotFound,

    /// The caller does not own the shop.
    #[error("not the owner of this shop")]
    Forbidden,

    /// The shop existed when checked but the write touched no row.
    #[error("shop {0} disappeared during write")]
    Vanished(ShopId),

    /// Search radius is negative or not finite.
    #[error("radius must be a non-negative number of kilometres")]
    InvalidRadius,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// `skip`/`limit` paging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Page {
    /// Number of items to skip.
    pub skip: i64,
    /// Maximum number of items to return.
    pub limit: i64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Page {
    /// Negative values become 0; `limit` is capped at `MAX_LIMIT`.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            skip: self.skip.max(0),
            limit: self.limit.clamp(0, MAX_LIMIT),
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn apply<T>(self, items: Vec<T>) -> Vec<T> {
        let page = self.clamped();
        items
            .into_iter()
            .skip(page.skip as usize)
            .take(page.limit as usize)
            .collect()
    }
}

/// Shop service.
pub struct ShopService<'a> {
    shops: ShopRepository<'a>,
}

impl<'a> ShopService<'a> {
    /// Create a new shop service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            shops: ShopRepository::new(pool),
        }
    }

    /// Create a shop owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::Repository` if the insert fails.
    pub async fn create(&self, owner: VendorId, draft: &ShopDraft) -> Result<Shop, ShopError> {
        let shop = self.shops.create(owner, draft).await?;
        tracing::info!(shop_id = %shop.id, vendor_id = %owner, "Shop created");
        Ok(shop)
    }

    /// Get a shop by ID.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::NotFound` if there is no such shop.
    pub async fn get(&self, id: ShopId) -> Result<Shop, ShopError> {
        self.shops.get(id).await?.ok_or(ShopError::NotFound)
    }

    /// List shops ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::Repository` if the query fails.
    pub async fn list(&self, page: Page) -> Result<Vec<Shop>, ShopError> {
        let page = page.clamped();
        Ok(self.shops.list(page.skip, page.limit).await?)
    }

    /// Replace every writable field of a shop owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::NotFound` if there is no such shop, or
    /// `ShopError::Forbidden` if `owner` does not own it.
    pub async fn update(
        &self,
        owner: VendorId,
        id: ShopId,
        draft: &ShopDraft,
    ) -> Result<Shop, ShopError> {
        self.owned(owner, id).await?;

        let shop = self
            .shops
            .replace(id, draft)
            .await?
            .ok_or(ShopError::Vanished(id))?;

        tracing::info!(shop_id = %id, vendor_id = %owner, "Shop updated");
        Ok(shop)
    }

    /// Delete a shop owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::NotFound` if there is no such shop, or
    /// `ShopError::Forbidden` if `owner` does not own it.
    pub async fn delete(&self, owner: VendorId, id: ShopId) -> Result<(), ShopError> {
        self.owned(owner, id).await?;

        if !self.shops.delete(id).await? {
            return Err(ShopError::Vanished(id));
        }

        tracing::info!(shop_id = %id, vendor_id = %owner, "Shop deleted");
        Ok(())
    }

    /// Shops within `radius_km` of `center`, nearest first.
    ///
    /// A shop exactly `radius_km` away is included. Ties in distance are
    /// broken by shop ID. Paging applies after ordering.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::InvalidRadius` if `radius_km` is negative or not
    /// finite.
    pub async fn nearby(
        &self,
        center: GeoPoint,
        radius_km: f64,
        page: Page,
    ) -> Result<Vec<Shop>, ShopError> {
        if !radius_km.is_finite() || radius_km < 0.0 {
            return Err(ShopError::InvalidRadius);
        }

        let (min_latitude, max_latitude) = center.latitude_band(radius_km);
        let candidates = self.shops.in_latitude_band(min_latitude, max_latitude).await?;
        let scanned = candidates.len();

        let mut hits: Vec<(f64, Shop)> = candidates
            .into_iter()
            .filter_map(|shop| {
                let location = shop.location().ok()?;
                let distance = center.distance_km(&location);
                (distance <= radius_km).then_some((distance, shop))
            })
            .collect();

        hits.sort_by(|(da, a), (db, b)| {
            da.partial_cmp(db)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });

        tracing::debug!(
            latitude = center.latitude(),
            longitude = center.longitude(),
            radius_km,
            scanned,
            matched = hits.len(),
            "Proximity search"
        );

        Ok(page.apply(hits.into_iter().map(|(_, shop)| shop).collect()))
    }

    /// Fetch a shop and check that `owner` owns it.
    async fn owned(&self, owner: VendorId, id: ShopId) -> Result<Shop, ShopError> {
        let shop = self.get(id).await?;
        if !shop.is_owned_by(owner) {
            return Err(ShopError::Forbidden);
        }
        Ok(shop)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use nearshop_core::Email;

    use super::*;
    use crate::db::{VendorRepository, create_memory_pool};

    fn draft(name: &str, latitude: f64, longitude: f64) -> ShopDraft {
        ShopDraft::new(
            name.to_string(),
            "O".to_string(),
            "Retail".to_string(),
            latitude,
            longitude,
        )
        .unwrap()
    }

    async fn vendor(pool: &SqlitePool, email: &str) -> VendorId {
        VendorRepository::new(pool)
            .create("V", &Email::parse(email).unwrap(), "hash")
            .await
            .unwrap()
            .id
    }

    fn point(latitude: f64, longitude: f64) -> GeoPoint {
        GeoPoint::new(latitude, longitude).unwrap()
    }

    #[test]
    fn test_page_defaults_and_clamping() {
        assert_eq!(Page::default(), Page { skip: 0, limit: 100 });
        assert_eq!(
            Page { skip: -5, limit: 5000 }.clamped(),
            Page { skip: 0, limit: MAX_LIMIT }
        );
        assert_eq!(
            Page { skip: 3, limit: -1 }.clamped(),
            Page { skip: 3, limit: 0 }
        );
    }

    #[test]
    fn test_page_deserializes_partial() {
        let page: Page = serde_json::from_str(r#"{"limit": 2}"#).unwrap();
        assert_eq!(page, Page { skip: 0, limit: 2 });
    }

    #[test]
    fn test_page_apply() {
        let items: Vec<i32> = (0..10).collect();
        assert_eq!(Page { skip: 2, limit: 3 }.apply(items.clone()), [2, 3, 4]);
        assert_eq!(Page { skip: 9, limit: 3 }.apply(items.clone()), [9]);
        assert!(Page { skip: 20, limit: 3 }.apply(items).is_empty());
    }

    #[tokio::test]
    async fn test_owner_can_update_and_delete() {
        let pool = create_memory_pool().await.unwrap();
        let owner = vendor(&pool, "owner@e.com").await;
        let service = ShopService::new(&pool);

        let shop = service.create(owner, &draft("S", 1.0, 1.0)).await.unwrap();
        let updated = service
            .update(owner, shop.id, &draft("S2", 2.0, 2.0))
            .await
            .unwrap();
        assert_eq!(updated.name, "S2");

        service.delete(owner, shop.id).await.unwrap();
        assert!(matches!(service.get(shop.id).await, Err(ShopError::NotFound)));
    }

    #[tokio::test]
    async fn test_non_owner_is_forbidden() {
        let pool = create_memory_pool().await.unwrap();
        let owner = vendor(&pool, "owner@e.com").await;
        let intruder = vendor(&pool, "intruder@e.com").await;
        let service = ShopService::new(&pool);

        let shop = service.create(owner, &draft("S", 1.0, 1.0)).await.unwrap();

        assert!(matches!(
            service.update(intruder, shop.id, &draft("X", 0.0, 0.0)).await,
            Err(ShopError::Forbidden)
        ));
        assert!(matches!(
            service.delete(intruder, shop.id).await,
            Err(ShopError::Forbidden)
        ));
        assert_eq!(service.get(shop.id).await.unwrap(), shop);
    }

    #[tokio::test]
    async fn test_missing_shop_is_not_found() {
        let pool = create_memory_pool().await.unwrap();
        let owner = vendor(&pool, "owner@e.com").await;
        let service = ShopService::new(&pool);
        let missing = ShopId::new(42);

        assert!(matches!(service.get(missing).await, Err(ShopError::NotFound)));
        assert!(matches!(
            service.update(owner, missing, &draft("X", 0.0, 0.0)).await,
            Err(ShopError::NotFound)
        ));
        assert!(matches!(
            service.delete(owner, missing).await,
            Err(ShopError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_nearby_radius() {
        let pool = create_memory_pool().await.unwrap();
        let owner = vendor(&pool, "owner@e.com").await;
        let service = ShopService::new(&pool);

        let shop = service
            .create(owner, &draft("NYC", 40.7128, -74.006))
            .await
            .unwrap();

        let hit = service
            .nearby(point(40.7128, -74.006), 1.0, Page::default())
            .await
            .unwrap();
        assert_eq!(hit, vec![shop]);

        // ~50 km north.
        let miss = service
            .nearby(point(41.1628, -74.006), 0.01, Page::default())
            .await
            .unwrap();
        assert!(miss.is_empty());
    }

    #[tokio::test]
    async fn test_nearby_radius_is_inclusive() {
        let pool = create_memory_pool().await.unwrap();
        let owner = vendor(&pool, "owner@e.com").await;
        let service = ShopService::new(&pool);

        let shop = service
            .create(owner, &draft("Edge", 1.0, 0.0))
            .await
            .unwrap();
        let center = point(0.0, 0.0);
        let exact = center.distance_km(&point(1.0, 0.0));

        let hit = service.nearby(center, exact, Page::default()).await.unwrap();
        assert_eq!(hit, vec![shop]);

        let miss = service
            .nearby(center, exact - 1e-6, Page::default())
            .await
            .unwrap();
        assert!(miss.is_empty());
    }

    #[tokio::test]
    async fn test_nearby_orders_by_distance_and_pages() {
        let pool = create_memory_pool().await.unwrap();
        let owner = vendor(&pool, "owner@e.com").await;
        let service = ShopService::new(&pool);

        let far = service.create(owner, &draft("Far", 0.2, 0.0)).await.unwrap();
        let near = service.create(owner, &draft("Near", 0.01, 0.0)).await.unwrap();
        let mid = service.create(owner, &draft("Mid", 0.1, 0.0)).await.unwrap();
        service
            .create(owner, &draft("Outside", 5.0, 0.0))
            .await
            .unwrap();

        let center = point(0.0, 0.0);
        let all = service.nearby(center, 50.0, Page::default()).await.unwrap();
        assert_eq!(all, vec![near.clone(), mid.clone(), far.clone()]);

        let second = service
            .nearby(center, 50.0, Page { skip: 1, limit: 1 })
            .await
            .unwrap();
        assert_eq!(second, vec![mid]);
    }

    #[tokio::test]
    async fn test_nearby_across_antimeridian() {
        let pool = create_memory_pool().await.unwrap();
        let owner = vendor(&pool, "owner@e.com").await;
        let service = ShopService::new(&pool);

        let east = service
            .create(owner, &draft("East", 0.0, 179.99))
            .await
            .unwrap();

        let found = service
            .nearby(point(0.0, -179.99), 5.0, Page::default())
            .await
            .unwrap();
        assert_eq!(found, vec![east]);
    }

    #[tokio::test]
    async fn test_nearby_rejects_bad_radius() {
        let pool = create_memory_pool().await.unwrap();
        let service = ShopService::new(&pool);

        for radius in [-1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                service.nearby(point(0.0, 0.0), radius, Page::default()).await,
                Err(ShopError::InvalidRadius)
            ));
        }
    }
}
