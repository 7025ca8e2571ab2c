use thiserror::Error;

use crate::track::{SynthesisId, TrackId};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A [CurveDefinition] needs at least its two anchors.
    #[error("malformed curve: at least 2 points required, got {0}")]
    MalformedCurve(usize),

    /// First and last curve points must sit on the anchors (primary datum).
    #[error("curve endpoint #{0} does not match its anchor position")]
    EndpointMismatch(usize),

    /// Sampling interval outside of the configured bounds.
    #[error("sampling interval {0}s is out of range [{1}s; {2}s]")]
    InvalidInterval(f64, f64, f64),

    #[error("unknown track {0}")]
    UnknownTrack(TrackId),

    #[error("no trajectory record at index {0}")]
    UnknownIndex(u64),

    #[error("unknown synthesis {0}")]
    UnknownSynthesis(SynthesisId),

    /// End anchor must come after the start anchor, in index and time.
    #[error("invalid anchors: #{0} must precede #{1} in index and time")]
    InvalidAnchors(u64, u64),

    #[error("unknown datum \"{0}\"")]
    UnknownDatum(String),

    /// The requested range intersects a previous gap-fill.
    #[error("range #{0}..#{1} overlaps synthesis {2}")]
    OverlappingSynthesis(u64, u64, SynthesisId),

    /// Time gap is shorter than (or equal to) one sampling interval.
    #[error("gap of {0}s is too short for a {1}s interval")]
    GapTooShort(f64, f64),

    /// Trajectory records already exist between both anchors.
    #[error("range #{0}..#{1} already contains {2} record(s)")]
    OccupiedRange(u64, u64, usize),

    /// The track was modified since it got validated. The whole operation
    /// may be submitted again.
    #[error("concurrent write on track {0}: expected version {1}, found {2}")]
    Conflict(TrackId, u64, u64),

    /// Storage backend failure.
    #[error("storage error: {0}")]
    Storage(String),
}

impl Error {
    /// True when the operation may be retried from scratch as is.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict(..))
    }
}
