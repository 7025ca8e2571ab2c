//! Trajectory records and gap-fill bookkeeping
use crate::{
    curve::CurveDefinition,
    datum::Datum,
    kinematic::KinematicState,
    position::{PlanarPoint, Positions},
    prelude::{Duration, Epoch},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Track identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrackId(pub u64);

impl std::fmt::Display for TrackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "T{}", self.0)
    }
}

/// [SynthesisRecord] identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SynthesisId(pub u64);

impl std::fmt::Display for SynthesisId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "S{}", self.0)
    }
}

/// One point of a track, either recorded or synthesized.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrajectoryRecord {
    /// Sequence index within the track
    pub index: u64,
    /// Sampling [Epoch]
    pub epoch: Epoch,
    /// Position in all [Datum]s
    pub position: Positions,
    /// Speed (m/s)
    pub speed: f64,
    /// Heading (degrees)
    pub heading: f64,
    /// Elevation (m)
    pub elevation: Option<f64>,
    /// True when created by a gap-fill
    pub synthesized: bool,
    /// Owning [SynthesisRecord], if any
    pub synthesis: Option<SynthesisId>,
}

impl TrajectoryRecord {
    /// Builds a recorded (not synthesized) [TrajectoryRecord]
    pub fn new(
        index: u64,
        epoch: Epoch,
        point: PlanarPoint,
        speed: f64,
        heading: f64,
        elevation: Option<f64>,
    ) -> Self {
        Self {
            index,
            epoch,
            position: Positions::from_point(&point),
            speed,
            heading,
            elevation,
            synthesized: false,
            synthesis: None,
        }
    }

    /// [KinematicState] of this record
    pub fn kinematic_state(&self) -> KinematicState {
        KinematicState {
            epoch: self.epoch,
            speed: self.speed,
            heading: self.heading,
            elevation: self.elevation,
        }
    }

    /// Clears the synthesis marker and back reference.
    pub(crate) fn detach(&mut self) {
        self.synthesized = false;
        self.synthesis = None;
    }
}

/// Gap boundary: start or end point of the interpolation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    /// Record index
    pub index: u64,
    /// Position, in primary [Datum]
    pub position: PlanarPoint,
    /// [KinematicState] at this point
    pub state: KinematicState,
}

impl Anchor {
    /// Builds an [Anchor] from a [TrajectoryRecord], expressed in [Datum]
    pub fn from_record(record: &TrajectoryRecord, datum: Datum) -> Self {
        Self {
            index: record.index,
            position: record.position.point(datum),
            state: record.kinematic_state(),
        }
    }

    pub fn epoch(&self) -> Epoch {
        self.state.epoch
    }
}

/// Bookkeeping of one completed gap-fill.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SynthesisRecord {
    pub id: SynthesisId,
    pub track: TrackId,
    /// Start anchor index
    pub start_index: u64,
    /// End anchor index, after reindexing
    pub end_index: u64,
    /// Curve as submitted, for audit and re-edition
    pub curve: CurveDefinition,
    /// Sampling interval
    pub interval: Duration,
    /// Number of synthesized records
    pub count: usize,
}

impl SynthesisRecord {
    /// True if this record anchor range intersects [start, end]
    pub fn overlaps(&self, start: u64, end: u64) -> bool {
        self.start_index < end && start < self.end_index
    }

    /// Indices of the records it owns
    pub fn owned_indices(&self) -> std::ops::Range<u64> {
        self.start_index + 1..self.start_index + 1 + self.count as u64
    }
}

/// Eligible gap between two consecutive recorded points.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Gap {
    pub start_index: u64,
    pub end_index: u64,
    /// Time between both points
    pub interval: Duration,
    pub start: Epoch,
    pub end: Epoch,
}
