//! Planar (longitude, latitude) positions
use nalgebra::Vector2;

use crate::{
    constants::EARTH_MEAN_RADIUS_M,
    datum::{convert, Datum},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Great-circle (haversine) distance in meters between two
/// (lon, lat) coordinates expressed in degrees.
pub fn great_circle_distance_m(a: Vector2<f64>, b: Vector2<f64>) -> f64 {
    let (lat_a, lat_b) = (a[1].to_radians(), b[1].to_radians());
    let d_lat = lat_b - lat_a;
    let d_lon = (b[0] - a[0]).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_MEAN_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// (longitude, latitude) pair in degrees, expressed in a [Datum].
#[derive(Default, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlanarPoint {
    /// Longitude in degrees
    pub longitude: f64,
    /// Latitude in degrees
    pub latitude: f64,
    /// [Datum] the coordinates are expressed in
    pub datum: Datum,
}

impl PlanarPoint {
    pub fn new(longitude: f64, latitude: f64, datum: Datum) -> Self {
        Self {
            longitude,
            latitude,
            datum,
        }
    }

    pub(crate) fn from_vector(v: Vector2<f64>, datum: Datum) -> Self {
        Self::new(v[0], v[1], datum)
    }

    /// Returns (lon, lat) as a vector
    pub fn to_vector(&self) -> Vector2<f64> {
        Vector2::new(self.longitude, self.latitude)
    }

    /// Expresses [Self] in another [Datum]
    pub fn to_datum(&self, datum: Datum) -> Self {
        let (lon, lat) = convert((self.longitude, self.latitude), self.datum, datum);
        Self::new(lon, lat, datum)
    }

    /// Great-circle distance to another point, in meters.
    /// `rhs` is converted to our [Datum] first.
    pub fn distance_m(&self, rhs: &Self) -> f64 {
        let rhs = rhs.to_datum(self.datum);
        great_circle_distance_m(self.to_vector(), rhs.to_vector())
    }
}

impl std::fmt::Display for PlanarPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.7}°, {:.7}°) {}", self.longitude, self.latitude, self.datum)
    }
}

/// One position materialized in all three [Datum]s.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Positions {
    /// (lon, lat) [Datum::WGS84]
    pub wgs84: (f64, f64),
    /// (lon, lat) [Datum::GCJ02]
    pub gcj02: (f64, f64),
    /// (lon, lat) [Datum::BD09]
    pub bd09: (f64, f64),
}

impl Positions {
    /// Builds all three representations from a [PlanarPoint]
    pub fn from_point(point: &PlanarPoint) -> Self {
        let lon_lat = (point.longitude, point.latitude);
        Self {
            wgs84: convert(lon_lat, point.datum, Datum::WGS84),
            gcj02: convert(lon_lat, point.datum, Datum::GCJ02),
            bd09: convert(lon_lat, point.datum, Datum::BD09),
        }
    }

    /// Returns the representation in requested [Datum]
    pub fn point(&self, datum: Datum) -> PlanarPoint {
        let (lon, lat) = match datum {
            Datum::WGS84 => self.wgs84,
            Datum::GCJ02 => self.gcj02,
            Datum::BD09 => self.bd09,
        };
        PlanarPoint::new(lon, lat, datum)
    }
}
