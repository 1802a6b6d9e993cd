//! Geofence validation for location reports.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mean Earth radius in kilometers (spherical Earth model).
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Errors from coordinate and geofence validation.
#[derive(Debug, Error)]
pub enum GeofenceError {
    /// Latitude or longitude outside valid Earth-coordinate range.
    #[error("coordinate out of range: ({latitude}, {longitude})")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    /// Geofence radius is negative or not a finite number.
    #[error("invalid geofence radius: {0} km")]
    InvalidRadius(f64),
}

/// A validated geographic coordinate pair in degrees.
///
/// Constructed only through [`Coordinates::new`], which rejects
/// latitudes outside -90..90 and longitudes outside -180..180.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// Create a coordinate pair, validating the Earth-coordinate range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeofenceError> {
        if !latitude.is_finite()
            || !longitude.is_finite()
            || latitude.abs() > 90.0
            || longitude.abs() > 180.0
        {
            return Err(GeofenceError::InvalidCoordinate {
                latitude,
                longitude,
            });
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

/// Great-circle distance between two points via the Haversine formula.
///
/// Symmetric, and zero for identical points.
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lon1 = a.longitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let lon2 = b.longitude.to_radians();

    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// The result of checking a point against a geofence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeofenceDecision {
    /// Whether the point falls within the allowed area.
    pub inside: bool,
    /// Distance from the area's reference point in kilometers.
    pub distance_km: f64,
}

/// An allowed-area test for location reports.
///
/// Implementations decide membership however they like (circle,
/// polygon, spatial index); callers only see the `inside` decision.
pub trait Geofence: Send + Sync {
    /// Check whether a point falls inside the allowed area.
    fn check(&self, point: Coordinates) -> GeofenceDecision;
}

/// A circular geofence: a center point plus a radius in kilometers.
///
/// The boundary is inclusive: a point exactly `radius_km` away counts
/// as inside.
#[derive(Debug, Clone, Copy)]
pub struct CircularGeofence {
    center: Coordinates,
    radius_km: f64,
}

impl CircularGeofence {
    /// Create a circular geofence, validating the radius.
    pub fn new(center: Coordinates, radius_km: f64) -> Result<Self, GeofenceError> {
        if !radius_km.is_finite() || radius_km < 0.0 {
            return Err(GeofenceError::InvalidRadius(radius_km));
        }
        Ok(Self { center, radius_km })
    }

    /// The center of the allowed area.
    pub fn center(&self) -> Coordinates {
        self.center
    }

    /// The allowed radius in kilometers.
    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }
}

impl Geofence for CircularGeofence {
    fn check(&self, point: Coordinates) -> GeofenceDecision {
        let distance_km = haversine_km(point, self.center);
        GeofenceDecision {
            inside: distance_km <= self.radius_km,
            distance_km,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CENTER_LAT: f64 = 19.523731621451685;
    const CENTER_LON: f64 = -99.2536655776822;

    fn center() -> Coordinates {
        Coordinates::new(CENTER_LAT, CENTER_LON).unwrap()
    }

    #[test]
    fn test_coordinates_valid_range() {
        assert!(Coordinates::new(0.0, 0.0).is_ok());
        assert!(Coordinates::new(90.0, 180.0).is_ok());
        assert!(Coordinates::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn test_coordinates_out_of_range() {
        assert!(matches!(
            Coordinates::new(90.1, 0.0),
            Err(GeofenceError::InvalidCoordinate { .. })
        ));
        assert!(matches!(
            Coordinates::new(0.0, -180.5),
            Err(GeofenceError::InvalidCoordinate { .. })
        ));
        assert!(matches!(
            Coordinates::new(f64::NAN, 0.0),
            Err(GeofenceError::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        assert_eq!(haversine_km(center(), center()), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = center();
        let b = Coordinates::new(19.6, -99.30).unwrap();
        assert_eq!(haversine_km(a, b), haversine_km(b, a));
    }

    #[test]
    fn test_report_at_center_is_inside() {
        let fence = CircularGeofence::new(center(), 5.0).unwrap();
        let decision = fence.check(center());
        assert!(decision.inside);
        assert_eq!(decision.distance_km, 0.0);
    }

    #[test]
    fn test_report_outside_radius() {
        // ~10.9 km from the center, well past the 5 km allowance.
        let fence = CircularGeofence::new(center(), 5.0).unwrap();
        let report = Coordinates::new(19.6, -99.30).unwrap();

        let decision = fence.check(report);
        assert!(!decision.inside);
        assert!((decision.distance_km - 10.9).abs() < 0.2);
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let report = Coordinates::new(19.6, -99.30).unwrap();
        let exact = haversine_km(report, center());

        let fence = CircularGeofence::new(center(), exact).unwrap();
        assert!(fence.check(report).inside);
    }

    #[test]
    fn test_invalid_radius_rejected() {
        assert!(matches!(
            CircularGeofence::new(center(), -1.0),
            Err(GeofenceError::InvalidRadius(_))
        ));
        assert!(matches!(
            CircularGeofence::new(center(), f64::INFINITY),
            Err(GeofenceError::InvalidRadius(_))
        ));
    }
}
