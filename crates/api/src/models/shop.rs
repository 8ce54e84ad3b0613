//! Shop domain types.

use serde::Serialize;
use thiserror::Error;

use nearshop_core::{CoordinateError, GeoPoint, ShopId, VendorId};

/// A shop (domain type).
///
/// `owner` is a free-text label; the authenticated owner of the record is
/// `vendor_id`.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Shop {
    /// Unique shop ID.
    pub id: ShopId,
    /// Display name.
    pub name: String,
    /// Owner label shown to the public.
    pub owner: String,
    /// Business category (e.g. "Retail").
    pub business_type: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Vendor that created the shop and may mutate it.
    pub vendor_id: VendorId,
}

impl Shop {
    /// Whether `vendor_id` is the vendor allowed to update or delete this shop.
    #[must_use]
    pub fn is_owned_by(&self, vendor_id: VendorId) -> bool {
        self.vendor_id == vendor_id
    }

    /// The shop's position.
    ///
    /// # Errors
    ///
    /// Returns `CoordinateError` if the stored coordinates are out of range.
    pub fn location(&self) -> Result<GeoPoint, CoordinateError> {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// Reasons a shop payload is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShopDraftError {
    /// A required text field is blank.
    #[error("{0} cannot be empty")]
    Blank(&'static str),
    /// Latitude or longitude is out of range.
    #[error(transparent)]
    Coordinates(#[from] CoordinateError),
}

/// Every writable field of a shop.
///
/// Creating a shop inserts a draft; updating a shop replaces all of the
/// record's fields with a draft. There is no partial update.
#[derive(Debug, Clone, PartialEq)]
pub struct ShopDraft {
    /// Display name (non-blank).
    pub name: String,
    /// Owner label.
    pub owner: String,
    /// Business category.
    pub business_type: String,
    /// Validated position.
    pub location: GeoPoint,
}

impl ShopDraft {
    /// Validate raw shop fields.
    ///
    /// # Errors
    ///
    /// Returns `ShopDraftError::Blank` if the name is blank, or
    /// `ShopDraftError::Coordinates` if the position is out of range.
    pub fn new(
        name: String,
        owner: String,
        business_type: String,
        latitude: f64,
        longitude: f64,
    ) -> Result<Self, ShopDraftError> {
        if name.trim().is_empty() {
            return Err(ShopDraftError::Blank("name"));
        }
        let location = GeoPoint::new(latitude, longitude)?;

        Ok(Self {
            name,
            owner,
            business_type,
            location,
        })
    }
}
