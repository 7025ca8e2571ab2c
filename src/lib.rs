#![doc = include_str!("../README.md")]
#![cfg_attr(docrs, feature(doc_cfg))]

// private modules
mod cfg;
mod constants;
mod curve;
mod datum;
mod error;
mod gapfill;
mod kinematic;
mod position;
mod store;
mod track;

#[cfg(test)]
mod tests;

// prelude
pub mod prelude {
    pub use crate::cfg::{Config, CurveOpts};
    pub use crate::curve::{ControlPoint, CubicSegment, CurveDefinition, CurvePath, Handle};
    pub use crate::datum::{convert, out_of_region, Datum};
    pub use crate::error::Error;
    pub use crate::gapfill::{GapFillRequest, GapFiller, SyntheticPoint};
    pub use crate::kinematic::{
        heading_delta, interpolate_epoch, interpolate_heading, lerp, normalize_heading,
        KinematicState,
    };
    pub use crate::position::{great_circle_distance_m, PlanarPoint, Positions};
    pub use crate::store::{MemoryStore, TrackSnapshot, TrackStore, TrackWriter};
    pub use crate::track::{Anchor, Gap, SynthesisId, SynthesisRecord, TrackId, TrajectoryRecord};
    // re-export
    pub use hifitime::{Duration, Epoch, TimeScale, Unit};
    pub use nalgebra::Vector2;
}

// pub export
pub use error::Error;
