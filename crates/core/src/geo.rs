//! Geographic coordinates and great-circle distance.
//!
//! Distances use the spherical law of cosines on a fixed Earth radius:
//!
//! ```text
//! d = R * acos( cos(lat1)·cos(lat2)·cos(lon2 - lon1) + sin(lat1)·sin(lat2) )
//! ```
//!
//! The `acos` argument is clamped to `[-1, 1]` because rounding can push it just
//! outside that range for identical or antipodal points.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Slack added to each side of a latitude band so rounding in the
/// degree conversion never drops a point that sits exactly on the radius.
const BAND_MARGIN_DEG: f64 = 1e-9;

/// Errors that can occur when building a [`GeoPoint`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum CoordinateError {
    /// Latitude is NaN, infinite, or outside `[-90, 90]`.
    #[error("latitude must be between -90 and 90 degrees (got {0})")]
    Latitude(f64),
    /// Longitude is NaN, infinite, or outside `[-180, 180]`.
    #[error("longitude must be between -180 and 180 degrees (got {0})")]
    Longitude(f64),
}

/// A validated latitude/longitude pair in degrees.
///
/// ```
/// use nearshop_core::GeoPoint;
///
/// let nyc = GeoPoint::new(40.7128, -74.006).unwrap();
/// assert!(nyc.distance_km(&nyc) < 0.001);
///
/// assert!(GeoPoint::new(91.0, 0.0).is_err());
/// assert!(GeoPoint::new(0.0, f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPoint", into = "RawPoint")]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

#[derive(Serialize, Deserialize)]
struct RawPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    /// Build a point, rejecting non-finite or out-of-range coordinates.
    ///
    /// # Errors
    ///
    /// Returns `CoordinateError::Latitude` or `CoordinateError::Longitude` for
    /// the first coordinate that is invalid.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::Latitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::Longitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance to `other` in kilometers.
    #[must_use]
    pub fn distance_km(&self, other: &Self) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let delta_lon = (other.longitude - self.longitude).to_radians();

        let cos_angle = lat1
            .cos()
            .mul_add(lat2.cos() * delta_lon.cos(), lat1.sin() * lat2.sin());

        EARTH_RADIUS_KM * cos_angle.clamp(-1.0, 1.0).acos()
    }

    /// Latitude band `(min, max)` in degrees that contains every point within
    /// `radius_km` of this one.
    ///
    /// A great-circle path can never change latitude faster than it travels,
    /// so any point outside this band is farther than `radius_km`. Useful as
    /// an index-friendly pre-filter before computing exact distances.
    #[must_use]
    pub fn latitude_band(&self, radius_km: f64) -> (f64, f64) {
        let delta = (radius_km / EARTH_RADIUS_KM).to_degrees() + BAND_MARGIN_DEG;
        (
            (self.latitude - delta).max(-90.0),
            (self.latitude + delta).min(90.0),
        )
    }
}

impl TryFrom<RawPoint> for GeoPoint {
    type Error = CoordinateError;

    fn try_from(raw: RawPoint) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude)
    }
}

impl From<GeoPoint> for RawPoint {
    fn from(point: GeoPoint) -> Self {
        Self {
            latitude: point.latitude,
            longitude: point.longitude,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn point(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert_eq!(
            GeoPoint::new(-90.5, 0.0),
            Err(CoordinateError::Latitude(-90.5))
        );
        assert_eq!(
            GeoPoint::new(0.0, 180.5),
            Err(CoordinateError::Longitude(180.5))
        );
        assert!(GeoPoint::new(f64::INFINITY, 0.0).is_err());
        assert!(GeoPoint::new(0.0, f64::NAN).is_err());
    }

    #[test]
    fn test_accepts_boundaries() {
        assert!(GeoPoint::new(90.0, 180.0).is_ok());
        assert!(GeoPoint::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn test_identical_points_are_zero_apart() {
        let p = point(40.7128, -74.006);
        let d = p.distance_km(&p);
        assert!(!d.is_nan());
        // The law of cosines is ill-conditioned near zero; sub-meter is exact enough.
        assert!(d.abs() < 0.001);
    }

    #[test]
    fn test_antipodal_points_do_not_produce_nan() {
        let a = point(0.0, 0.0);
        let b = point(0.0, 180.0);
        let d = a.distance_km(&b);
        let half_circumference = std::f64::consts::PI * EARTH_RADIUS_KM;
        assert!((d - half_circumference).abs() < 1e-6);
    }

    #[test]
    fn test_known_distance_new_york_to_london() {
        let nyc = point(40.7128, -74.006);
        let london = point(51.5074, -0.1278);
        let d = nyc.distance_km(&london);
        assert!((d - 5570.0).abs() < 10.0, "got {d}");
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = point(12.5, 100.25);
        let b = point(-33.9, 151.2);
        assert!((a.distance_km(&b) - b.distance_km(&a)).abs() < 1e-9);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let a = point(0.0, 0.0);
        let b = point(1.0, 0.0);
        let expected = EARTH_RADIUS_KM * 1.0_f64.to_radians();
        assert!((a.distance_km(&b) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_latitude_band_contains_radius() {
        let center = point(10.0, 20.0);
        let (min, max) = center.latitude_band(111.0);
        assert!(min < 9.01 && min > 8.99);
        assert!(max > 10.99 && max < 11.01);
    }

    #[test]
    fn test_latitude_band_keeps_point_on_the_radius() {
        let center = point(0.0, 0.0);
        let edge = point(1.0, 0.0);
        let (min, max) = center.latitude_band(center.distance_km(&edge));
        assert!(min <= -1.0);
        assert!(max >= 1.0);
    }

    #[test]
    fn test_latitude_band_clamps_at_poles() {
        let (min, max) = point(89.9, 0.0).latitude_band(500.0);
        assert!((max - 90.0).abs() < f64::EPSILON);
        assert!(min < 89.9);

        let (min, _) = point(-89.9, 0.0).latitude_band(500.0);
        assert!((min + 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_serde_validates() {
        let ok: GeoPoint = serde_json::from_str(r#"{"latitude":1.5,"longitude":2.5}"#).unwrap();
        assert!((ok.latitude() - 1.5).abs() < f64::EPSILON);

        assert!(serde_json::from_str::<GeoPoint>(r#"{"latitude":100,"longitude":0}"#).is_err());
    }
}
