//! WGS84 <=> GCJ02 empirical offset model.
use std::f64::consts::PI;

use crate::constants::{KRASOVSKY_ECCENTRICITY_SQUARED, KRASOVSKY_SEMI_MAJOR_AXIS_M};

use super::out_of_region;

/// Fixed point iterations are stopped below this residual (degrees)
const INVERSION_THRESHOLD_DEG: f64 = 1.0E-9;

/// Fixed point iterations limit
const MAX_INVERSION_ITERATIONS: usize = 30;

/// Inverted coordinates must reproduce their input within this error (degrees)
pub(crate) const REPRODUCTION_TOLERANCE_DEG: f64 = 1.0E-8;

fn latitude_polynomial(x: f64, y: f64) -> f64 {
    let mut ret = -100.0 + 2.0 * x + 3.0 * y + 0.2 * y * y + 0.1 * x * y + 0.2 * x.abs().sqrt();
    ret += (20.0 * (6.0 * x * PI).sin() + 20.0 * (2.0 * x * PI).sin()) * 2.0 / 3.0;
    ret += (20.0 * (y * PI).sin() + 40.0 * (y / 3.0 * PI).sin()) * 2.0 / 3.0;
    ret += (160.0 * (y / 12.0 * PI).sin() + 320.0 * (y * PI / 30.0).sin()) * 2.0 / 3.0;
    ret
}

fn longitude_polynomial(x: f64, y: f64) -> f64 {
    let mut ret = 300.0 + x + 2.0 * y + 0.1 * x * x + 0.1 * x * y + 0.1 * x.abs().sqrt();
    ret += (20.0 * (6.0 * x * PI).sin() + 20.0 * (2.0 * x * PI).sin()) * 2.0 / 3.0;
    ret += (20.0 * (x * PI).sin() + 40.0 * (x / 3.0 * PI).sin()) * 2.0 / 3.0;
    ret += (150.0 * (x / 12.0 * PI).sin() + 300.0 * (x / 30.0 * PI).sin()) * 2.0 / 3.0;
    ret
}

/// GCJ02 - WGS84 offset (degrees) evaluated at WGS84 coordinates.
fn offset(lon: f64, lat: f64) -> (f64, f64) {
    let a = KRASOVSKY_SEMI_MAJOR_AXIS_M;
    let ee = KRASOVSKY_ECCENTRICITY_SQUARED;

    let d_lat = latitude_polynomial(lon - 105.0, lat - 35.0);
    let d_lon = longitude_polynomial(lon - 105.0, lat - 35.0);

    let rad_lat = lat.to_radians();
    let magic = 1.0 - ee * rad_lat.sin().powi(2);
    let sqrt_magic = magic.sqrt();

    let d_lat = (d_lat * 180.0) / ((a * (1.0 - ee)) / (magic * sqrt_magic) * PI);
    let d_lon = (d_lon * 180.0) / (a / sqrt_magic * rad_lat.cos() * PI);
    (d_lon, d_lat)
}

/// WGS84 to GCJ02, regardless of the calibrated region.
fn forward(lon: f64, lat: f64) -> (f64, f64) {
    let (d_lon, d_lat) = offset(lon, lat);
    (lon + d_lon, lat + d_lat)
}

/// Converts WGS84 (lon, lat) to GCJ02.
pub fn from_wgs84(lon: f64, lat: f64) -> (f64, f64) {
    if out_of_region(lon, lat) {
        return (lon, lat);
    }
    forward(lon, lat)
}

/// WGS84 antecedent of a GCJ02 (lon, lat), when it lies within the
/// calibrated region. The offset model has no closed form inverse: we
/// iterate on the forward model until it lands on the GCJ02 input.
/// The GCJ02 input itself may sit slightly outside the region.
pub(crate) fn antecedent(lon: f64, lat: f64) -> Option<(f64, f64)> {
    let (d_lon, d_lat) = offset(lon, lat);
    let (mut wgs_lon, mut wgs_lat) = (lon - d_lon, lat - d_lat);

    for _ in 0..MAX_INVERSION_ITERATIONS {
        let (gcj_lon, gcj_lat) = forward(wgs_lon, wgs_lat);
        let (err_lon, err_lat) = (gcj_lon - lon, gcj_lat - lat);

        wgs_lon -= err_lon;
        wgs_lat -= err_lat;

        if err_lon.abs() < INVERSION_THRESHOLD_DEG && err_lat.abs() < INVERSION_THRESHOLD_DEG {
            break;
        }
    }

    if out_of_region(wgs_lon, wgs_lat) {
        return None;
    }

    let (gcj_lon, gcj_lat) = forward(wgs_lon, wgs_lat);
    if (gcj_lon - lon).abs() > REPRODUCTION_TOLERANCE_DEG
        || (gcj_lat - lat).abs() > REPRODUCTION_TOLERANCE_DEG
    {
        return None;
    }

    Some((wgs_lon, wgs_lat))
}

/// Converts GCJ02 (lon, lat) to WGS84.
/// Identity when no WGS84 antecedent exists within the calibrated region.
pub fn to_wgs84(lon: f64, lat: f64) -> (f64, f64) {
    antecedent(lon, lat).unwrap_or((lon, lat))
}
