//! Kinematic attributes interpolation (time, speed, heading, elevation)
use crate::prelude::{Duration, Epoch};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Linear interpolation between `start` and `end`, `t` in [0, 1].
pub fn lerp(start: f64, end: f64, t: f64) -> f64 {
    start + (end - start) * t
}

/// Maps any angle (degrees) into [0, 360)
pub fn normalize_heading(heading: f64) -> f64 {
    let h = heading.rem_euclid(360.0);
    // rem_euclid may round up to 360.0 for tiny negative inputs
    if h >= 360.0 {
        0.0
    } else {
        h
    }
}

/// Signed shortest angular delta (degrees) from `start` to `end`, in (-180, 180].
pub fn heading_delta(start: f64, end: f64) -> f64 {
    let delta = (end - start + 540.0).rem_euclid(360.0) - 180.0;
    if delta <= -180.0 {
        180.0
    } else {
        delta
    }
}

/// Heading interpolation along the shorter arc of the circle.
/// Output in [0, 360).
pub fn interpolate_heading(start: f64, end: f64, t: f64) -> f64 {
    normalize_heading(start + heading_delta(start, end) * t)
}

/// Linear [Epoch] interpolation.
pub fn interpolate_epoch(start: Epoch, end: Epoch, t: f64) -> Epoch {
    let dt = end - start;
    start + Duration::from_seconds(dt.to_seconds() * t)
}

/// Kinematic state of a trajectory point
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KinematicState {
    /// Sampling [Epoch]
    pub epoch: Epoch,
    /// Speed (m/s)
    pub speed: f64,
    /// Heading (degrees, 0 = north, clockwise)
    pub heading: f64,
    /// Elevation (meters), when known
    pub elevation: Option<f64>,
}

impl KinematicState {
    /// Interpolates speed, heading and elevation at progress `t` in [0, 1].
    /// Elevation only exists when both ends have one.
    /// The [Epoch] is interpolated linearly as well,
    /// see [Self::interpolate_at] to impose it.
    pub fn interpolate(&self, rhs: &Self, t: f64) -> Self {
        Self {
            epoch: interpolate_epoch(self.epoch, rhs.epoch, t),
            speed: lerp(self.speed, rhs.speed, t),
            heading: interpolate_heading(self.heading, rhs.heading, t),
            elevation: match (self.elevation, rhs.elevation) {
                (Some(lhs), Some(rhs)) => Some(lerp(lhs, rhs, t)),
                _ => None,
            },
        }
    }

    /// Interpolates at a given [Epoch] between [Self] and `rhs`:
    /// progress is the elapsed time fraction.
    pub fn interpolate_at(&self, rhs: &Self, epoch: Epoch) -> Self {
        let total = (rhs.epoch - self.epoch).to_seconds();
        let t = if total > 0.0 {
            (epoch - self.epoch).to_seconds() / total
        } else {
            0.0
        };
        let mut state = self.interpolate(rhs, t);
        state.epoch = epoch;
        state
    }
}
