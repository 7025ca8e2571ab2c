//! Trajectory storage contract.
//!
//! The gap-fill only reads track snapshots and writes through
//! one all-or-nothing transaction per operation.
use crate::{
    error::Error,
    track::{SynthesisId, SynthesisRecord, TrackId, TrajectoryRecord},
};

mod memory;
pub use memory::MemoryStore;

/// Consistent view of one track.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackSnapshot {
    pub track: TrackId,
    /// Bumped by every committed transaction
    pub version: u64,
    /// All [TrajectoryRecord]s, ordered by index
    pub records: Vec<TrajectoryRecord>,
    /// All [SynthesisRecord]s of this track
    pub syntheses: Vec<SynthesisRecord>,
}

impl TrackSnapshot {
    /// Record at given index
    pub fn record(&self, index: u64) -> Option<&TrajectoryRecord> {
        self.records
            .binary_search_by_key(&index, |rec| rec.index)
            .ok()
            .map(|pos| &self.records[pos])
    }

    /// Records strictly between `start` and `end` indices
    pub fn records_between(&self, start: u64, end: u64) -> &[TrajectoryRecord] {
        let lower = self.records.partition_point(|rec| rec.index <= start);
        let upper = self.records.partition_point(|rec| rec.index < end);
        if lower < upper {
            &self.records[lower..upper]
        } else {
            &[]
        }
    }
}

/// Write access to one track, within a transaction.
pub trait TrackWriter {
    /// Adds `by` to every record index greater than `after`.
    /// [SynthesisRecord] index ranges located after `after` follow.
    fn shift_indices(&mut self, after: u64, by: u64) -> Result<(), Error>;

    /// Reserves a new [SynthesisId]
    fn allocate_synthesis_id(&mut self) -> Result<SynthesisId, Error>;

    /// Stores a new [SynthesisRecord]
    fn insert_synthesis(&mut self, synthesis: SynthesisRecord) -> Result<(), Error>;

    /// Stores new [TrajectoryRecord]s. Indices must be free.
    fn insert_records(&mut self, records: Vec<TrajectoryRecord>) -> Result<(), Error>;

    /// Removes a [SynthesisRecord] and detaches the records it owns.
    /// Other indices are left untouched. Returns the number of detached records.
    fn detach_synthesis(&mut self, id: SynthesisId) -> Result<usize, Error>;
}

/// Trajectory storage.
pub trait TrackStore {
    /// Returns a [TrackSnapshot] of this track
    fn snapshot(&self, track: TrackId) -> Result<TrackSnapshot, Error>;

    /// Returns a [SynthesisRecord], whatever its track
    fn synthesis(&self, id: SynthesisId) -> Result<SynthesisRecord, Error>;

    /// Runs `f` against this track, exclusively.
    /// Writes are published only if `f` succeeds, otherwise nothing happens.
    /// Returns [Error::Conflict] when the track version is no longer `expected_version`.
    fn transaction<T, F>(&self, track: TrackId, expected_version: u64, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut dyn TrackWriter) -> Result<T, Error>;
}
