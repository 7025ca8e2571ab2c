//! GCJ02 <=> BD09 perturbation.
use crate::constants::{BD09_LATITUDE_SHIFT_DEG, BD09_LONGITUDE_SHIFT_DEG, BD09_X_PI};

use super::gcj02::{antecedent, REPRODUCTION_TOLERANCE_DEG};

/// Refinement iterations of the closed form inverse
const MAX_INVERSION_ITERATIONS: usize = 10;

/// GCJ02 to BD09, regardless of the calibrated region.
fn forward(lon: f64, lat: f64) -> (f64, f64) {
    let z = (lon * lon + lat * lat).sqrt() + 0.00002 * (lat * BD09_X_PI).sin();
    let theta = lat.atan2(lon) + 0.000003 * (lon * BD09_X_PI).cos();
    (
        z * theta.cos() + BD09_LONGITUDE_SHIFT_DEG,
        z * theta.sin() + BD09_LATITUDE_SHIFT_DEG,
    )
}

/// Converts GCJ02 (lon, lat) to BD09.
/// Identity when this GCJ02 point has no WGS84 antecedent
/// within the calibrated region.
pub fn from_gcj02(lon: f64, lat: f64) -> (f64, f64) {
    if antecedent(lon, lat).is_none() {
        return (lon, lat);
    }
    forward(lon, lat)
}

/// Converts BD09 (lon, lat) to GCJ02.
pub fn to_gcj02(lon: f64, lat: f64) -> (f64, f64) {
    let (x, y) = (lon - BD09_LONGITUDE_SHIFT_DEG, lat - BD09_LATITUDE_SHIFT_DEG);
    let z = (x * x + y * y).sqrt() - 0.00002 * (y * BD09_X_PI).sin();
    let theta = y.atan2(x) - 0.000003 * (x * BD09_X_PI).cos();
    let (mut gcj_lon, mut gcj_lat) = (z * theta.cos(), z * theta.sin());

    // the closed form is approximate
    for _ in 0..MAX_INVERSION_ITERATIONS {
        let (bd_lon, bd_lat) = forward(gcj_lon, gcj_lat);
        let (err_lon, err_lat) = (bd_lon - lon, bd_lat - lat);
        if err_lon.abs() < REPRODUCTION_TOLERANCE_DEG / 10.0
            && err_lat.abs() < REPRODUCTION_TOLERANCE_DEG / 10.0
        {
            break;
        }
        gcj_lon -= err_lon;
        gcj_lat -= err_lat;
    }

    let (bd_lon, bd_lat) = forward(gcj_lon, gcj_lat);
    let reproduced = (bd_lon - lon).abs() <= REPRODUCTION_TOLERANCE_DEG
        && (bd_lat - lat).abs() <= REPRODUCTION_TOLERANCE_DEG;

    if reproduced && antecedent(gcj_lon, gcj_lat).is_some() {
        (gcj_lon, gcj_lat)
    } else {
        (lon, lat)
    }
}
