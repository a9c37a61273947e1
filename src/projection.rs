//! Geodetic-to-Cartesian projection onto a fixed-radius sphere.
//!
//! Latitude/longitude pairs are mapped to 3-D points on a sphere of radius
//! [`EARTH_RADIUS_KM`], so Euclidean distance between projected points is
//! chord (straight-line) distance in kilometers. The spherical model ignores
//! elevation and the Earth's oblateness; that is a deliberate approximation,
//! not a defect.
//!
//! Build and query paths both call [`project`], so a query point for an
//! indexed record maps bit-for-bit to the position used when it was inserted.

use geo::Point;
use serde::{Deserialize, Serialize};

/// Sphere radius in kilometers; projected distances come out in the same
/// unit.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A 3-D Cartesian coordinate on the projection sphere, in kilometers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl ProjectedPoint {
    /// Squared Euclidean distance to another projected point.
    ///
    /// Monotonic in the true distance; used on hot paths to defer the
    /// square root until results are surfaced.
    pub fn distance_sq(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    /// Euclidean (chord) distance to another projected point, in kilometers.
    pub fn distance(&self, other: &Self) -> f64 {
        self.distance_sq(other).sqrt()
    }

    /// Coordinate along a split axis (0 = x, 1 = y, 2 = z).
    pub(crate) fn axis(&self, axis: usize) -> f64 {
        match axis {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }
}

/// Project a geographic point (x = longitude, y = latitude, degrees) onto
/// the sphere.
///
/// Pure and deterministic:
/// x = R·cos(lat)·cos(lon), y = R·cos(lat)·sin(lon), z = R·sin(lat).
///
/// # Examples
///
/// ```rust
/// use gazetteer::projection::{EARTH_RADIUS_KM, project};
/// use geo::Point;
///
/// // The null island projects onto the positive x axis.
/// let origin = project(&Point::new(0.0, 0.0));
/// assert_eq!(origin.x, EARTH_RADIUS_KM);
/// assert_eq!(origin.y, 0.0);
/// assert_eq!(origin.z, 0.0);
///
/// // The north pole projects onto the positive z axis.
/// let pole = project(&Point::new(0.0, 90.0));
/// assert!((pole.z - EARTH_RADIUS_KM).abs() < 1e-9);
/// ```
pub fn project(point: &Point) -> ProjectedPoint {
    let lat = point.y().to_radians();
    let lon = point.x().to_radians();

    ProjectedPoint {
        x: EARTH_RADIUS_KM * lat.cos() * lon.cos(),
        y: EARTH_RADIUS_KM * lat.cos() * lon.sin(),
        z: EARTH_RADIUS_KM * lat.sin(),
    }
}
