#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    constants::{
        DEFAULT_LENGTH_STEPS, DEFAULT_REFINE_STEPS, MAX_SAMPLING_INTERVAL_S,
        MIN_SAMPLING_INTERVAL_S,
    },
    datum::Datum,
};

fn default_length_steps() -> usize {
    DEFAULT_LENGTH_STEPS
}

fn default_refine_steps() -> usize {
    DEFAULT_REFINE_STEPS
}

fn default_min_interval() -> f64 {
    MIN_SAMPLING_INTERVAL_S
}

fn default_max_interval() -> f64 {
    MAX_SAMPLING_INTERVAL_S
}

fn default_endpoint_tolerance() -> f64 {
    1.0E-7
}

/// Curve sampling resolution
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CurveOpts {
    /// Uniform steps used to estimate each segment length.
    #[cfg_attr(feature = "serde", serde(default = "default_length_steps"))]
    pub length_steps: usize,
    /// Uniform steps used to locate a point at given arc length,
    /// within its segment.
    #[cfg_attr(feature = "serde", serde(default = "default_refine_steps"))]
    pub refine_steps: usize,
}

impl Default for CurveOpts {
    fn default() -> Self {
        Self {
            length_steps: default_length_steps(),
            refine_steps: default_refine_steps(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Primary [Datum]: anchors and curve definitions are expressed in it.
    #[cfg_attr(feature = "serde", serde(default))]
    pub datum: Datum,
    /// Smallest sampling interval we accept (s).
    #[cfg_attr(feature = "serde", serde(default = "default_min_interval"))]
    pub min_interval_s: f64,
    /// Largest sampling interval we accept (s).
    #[cfg_attr(feature = "serde", serde(default = "default_max_interval"))]
    pub max_interval_s: f64,
    /// Curve first/last points must lie within this distance (degrees)
    /// of their anchors.
    #[cfg_attr(feature = "serde", serde(default = "default_endpoint_tolerance"))]
    pub endpoint_tolerance_deg: f64,
    /// [CurveOpts] sampling resolution
    #[cfg_attr(feature = "serde", serde(default))]
    pub curve: CurveOpts,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            datum: Datum::default(),
            min_interval_s: default_min_interval(),
            max_interval_s: default_max_interval(),
            endpoint_tolerance_deg: default_endpoint_tolerance(),
            curve: CurveOpts::default(),
        }
    }
}

impl Config {
    /// Returns [Config] for anchors and curves expressed in given [Datum].
    /// You can then customize [Self] as you will.
    pub fn with_datum(datum: Datum) -> Self {
        Self {
            datum,
            ..Default::default()
        }
    }

    /// Returns a copy of [Self] with a different curve sampling resolution.
    pub fn with_curve_resolution(&self, length_steps: usize, refine_steps: usize) -> Self {
        let mut s = self.clone();
        s.curve = CurveOpts {
            length_steps,
            refine_steps,
        };
        s
    }
}
