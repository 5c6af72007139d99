//! # Geometry — Validated Geographic Points
//!
//! Locations optionally carry a geographic point. The type is validated on
//! construction: out-of-range or non-finite coordinates cannot exist in a
//! stored record.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error constructing a [`GeoPoint`] from raw coordinates.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Latitude outside [-90, 90] or not a finite number.
    #[error("latitude out of range [-90, 90]: {0}")]
    LatitudeOutOfRange(f64),

    /// Longitude outside [-180, 180] or not a finite number.
    #[error("longitude out of range [-180, 180]: {0}")]
    LongitudeOutOfRange(f64),
}

/// A validated WGS 84 point.
///
/// Construct via [`GeoPoint::new`]; the deserialize impl routes through the
/// same validation, so a malformed point cannot enter through persistence
/// either.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeoPoint")]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

/// Unvalidated wire form of a point, used only as a deserialization step.
#[derive(Deserialize)]
struct RawGeoPoint {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawGeoPoint> for GeoPoint {
    type Error = GeometryError;

    fn try_from(raw: RawGeoPoint) -> Result<Self, Self::Error> {
        GeoPoint::new(raw.latitude, raw.longitude)
    }
}

impl GeoPoint {
    /// Create a validated point.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeometryError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(GeometryError::LatitudeOutOfRange(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(GeometryError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_point() {
        let p = GeoPoint::new(52.52, 13.405).unwrap();
        assert_eq!(p.latitude(), 52.52);
        assert_eq!(p.longitude(), 13.405);
    }

    #[test]
    fn test_boundary_values_accepted() {
        assert!(GeoPoint::new(90.0, 180.0).is_ok());
        assert!(GeoPoint::new(-90.0, -180.0).is_ok());
        assert!(GeoPoint::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn test_latitude_out_of_range() {
        assert_eq!(
            GeoPoint::new(90.1, 0.0),
            Err(GeometryError::LatitudeOutOfRange(90.1))
        );
        assert!(GeoPoint::new(-91.0, 0.0).is_err());
    }

    #[test]
    fn test_longitude_out_of_range() {
        assert_eq!(
            GeoPoint::new(0.0, 180.5),
            Err(GeometryError::LongitudeOutOfRange(180.5))
        );
        assert!(GeoPoint::new(0.0, -181.0).is_err());
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Result<GeoPoint, _> =
            serde_json::from_str(r#"{"latitude": 10.0, "longitude": 20.0}"#);
        assert!(ok.is_ok());

        let bad: Result<GeoPoint, _> =
            serde_json::from_str(r#"{"latitude": 95.0, "longitude": 20.0}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let p = GeoPoint::new(-33.86, 151.21).unwrap();
        let json = serde_json::to_string(&p).unwrap();
        let parsed: GeoPoint = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, p);
    }
}
