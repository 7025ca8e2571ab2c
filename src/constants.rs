/// Earth mean radius (meters), used by the great-circle distance
pub const EARTH_MEAN_RADIUS_M: f64 = 6_371_000.0;

/// Krasovsky 1940 ellipsoid semi-major axis (meters), the GCJ02 offset model's reference
pub const KRASOVSKY_SEMI_MAJOR_AXIS_M: f64 = 6_378_245.0;

/// Krasovsky 1940 ellipsoid first eccentricity squared
pub const KRASOVSKY_ECCENTRICITY_SQUARED: f64 = 0.006_693_421_622_965_943;

/// BD09 perturbation angular factor (rad/deg)
pub const BD09_X_PI: f64 = std::f64::consts::PI * 3000.0 / 180.0;

/// BD09 constant longitude shift (degrees)
pub const BD09_LONGITUDE_SHIFT_DEG: f64 = 0.0065;

/// BD09 constant latitude shift (degrees)
pub const BD09_LATITUDE_SHIFT_DEG: f64 = 0.006;

/// Longitude range (degrees) the GCJ02 / BD09 offset model was calibrated for
pub const CALIBRATED_LONGITUDE_DEG: (f64, f64) = (72.004, 137.8347);

/// Latitude range (degrees) the GCJ02 / BD09 offset model was calibrated for
pub const CALIBRATED_LATITUDE_DEG: (f64, f64) = (0.8293, 55.8271);

/// Number of uniform steps used to estimate one curve segment length
pub const DEFAULT_LENGTH_STEPS: usize = 20;

/// Number of uniform steps used to refine a point-at-length query
pub const DEFAULT_REFINE_STEPS: usize = 100;

/// Smallest accepted sampling interval (seconds)
pub const MIN_SAMPLING_INTERVAL_S: f64 = 0.1;

/// Largest accepted sampling interval (seconds)
pub const MAX_SAMPLING_INTERVAL_S: f64 = 60.0;
