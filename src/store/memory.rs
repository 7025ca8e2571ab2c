use std::{
    collections::{BTreeMap, HashMap},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, RwLock,
    },
};

use log::{debug, error};

use crate::{
    error::Error,
    position::PlanarPoint,
    prelude::Epoch,
    store::{TrackSnapshot, TrackStore, TrackWriter},
    track::{SynthesisId, SynthesisRecord, TrackId, TrajectoryRecord},
};

#[derive(Debug, Clone, Default)]
struct TrackData {
    version: u64,
    /// Ordered by index
    records: Vec<TrajectoryRecord>,
    syntheses: BTreeMap<SynthesisId, SynthesisRecord>,
}

impl TrackData {
    fn snapshot(&self, track: TrackId) -> TrackSnapshot {
        TrackSnapshot {
            track,
            version: self.version,
            records: self.records.clone(),
            syntheses: self.syntheses.values().cloned().collect(),
        }
    }
}

/// In-memory [TrackStore].
///
/// Each track sits behind its own mutex: writers of one track are serialized,
/// different tracks never wait on each other. Transactions work on a staged
/// copy that replaces the track data only when the transaction succeeds.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tracks: RwLock<HashMap<TrackId, Arc<Mutex<TrackData>>>>,
    /// Owning track of each [SynthesisRecord]
    owners: RwLock<HashMap<SynthesisId, TrackId>>,
    next_synthesis_id: AtomicU64,
}

fn poisoned<T>(_: T) -> Error {
    Error::Storage("poisoned lock".to_string())
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn track(&self, track: TrackId) -> Result<Arc<Mutex<TrackData>>, Error> {
        let tracks = self.tracks.read().map_err(poisoned)?;
        tracks.get(&track).cloned().ok_or(Error::UnknownTrack(track))
    }

    /// Creates (or replaces) a track with given records.
    /// A replaced track keeps its lock and moves on to the next version:
    /// pending transactions on it are rejected with [Error::Conflict].
    /// Its previous [SynthesisRecord]s are dropped.
    pub fn insert_track(&self, track: TrackId, mut records: Vec<TrajectoryRecord>) -> Result<(), Error> {
        records.sort_by_key(|rec| rec.index);

        let data = {
            let mut tracks = self.tracks.write().map_err(poisoned)?;
            match tracks.get(&track).cloned() {
                Some(data) => data,
                None => {
                    let data = TrackData {
                        version: 0,
                        records,
                        syntheses: BTreeMap::new(),
                    };
                    tracks.insert(track, Arc::new(Mutex::new(data)));
                    return Ok(());
                },
            }
        };

        let mut data = data.lock().map_err(poisoned)?;

        let mut owners = self.owners.write().map_err(poisoned)?;
        owners.retain(|_, owner| *owner != track);

        data.version += 1;
        data.records = records;
        data.syntheses.clear();

        debug!("{}: replaced, version {}", track, data.version);
        Ok(())
    }

    /// Appends a recorded point at the end of a track (created if needed).
    /// Returns its index.
    pub fn push_record(
        &self,
        track: TrackId,
        epoch: Epoch,
        point: PlanarPoint,
        speed: f64,
        heading: f64,
        elevation: Option<f64>,
    ) -> Result<u64, Error> {
        let data = {
            let mut tracks = self.tracks.write().map_err(poisoned)?;
            tracks.entry(track).or_default().clone()
        };
        let mut data = data.lock().map_err(poisoned)?;
        let index = data.records.last().map(|rec| rec.index + 1).unwrap_or(0);
        data.records.push(TrajectoryRecord::new(
            index, epoch, point, speed, heading, elevation,
        ));
        data.version += 1;
        Ok(index)
    }
}

impl TrackStore for MemoryStore {
    fn snapshot(&self, track: TrackId) -> Result<TrackSnapshot, Error> {
        let data = self.track(track)?;
        let data = data.lock().map_err(poisoned)?;
        Ok(data.snapshot(track))
    }

    fn synthesis(&self, id: SynthesisId) -> Result<SynthesisRecord, Error> {
        let track = {
            let owners = self.owners.read().map_err(poisoned)?;
            *owners.get(&id).ok_or(Error::UnknownSynthesis(id))?
        };
        let data = self.track(track)?;
        let data = data.lock().map_err(poisoned)?;
        data.syntheses
            .get(&id)
            .cloned()
            .ok_or(Error::UnknownSynthesis(id))
    }

    fn transaction<T, F>(&self, track: TrackId, expected_version: u64, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut dyn TrackWriter) -> Result<T, Error>,
    {
        let data = self.track(track)?;
        let mut data = data.lock().map_err(poisoned)?;

        if data.version != expected_version {
            return Err(Error::Conflict(track, expected_version, data.version));
        }

        let mut writer = MemoryWriter {
            staged: data.clone(),
            ids: &self.next_synthesis_id,
        };

        match f(&mut writer) {
            Ok(value) => {
                let mut staged = writer.staged;
                staged.version += 1;

                let mut owners = self.owners.write().map_err(poisoned)?;
                owners.retain(|id, owner| *owner != track || staged.syntheses.contains_key(id));
                for id in staged.syntheses.keys() {
                    owners.insert(*id, track);
                }

                debug!("{}: committed version {}", track, staged.version);
                *data = staged;
                Ok(value)
            },
            Err(e) => {
                error!("{}: transaction rolled back: {}", track, e);
                Err(e)
            },
        }
    }
}

struct MemoryWriter<'a> {
    staged: TrackData,
    ids: &'a AtomicU64,
}

impl TrackWriter for MemoryWriter<'_> {
    fn shift_indices(&mut self, after: u64, by: u64) -> Result<(), Error> {
        for rec in self.staged.records.iter_mut() {
            if rec.index > after {
                rec.index += by;
            }
        }
        for synthesis in self.staged.syntheses.values_mut() {
            if synthesis.start_index > after {
                synthesis.start_index += by;
            }
            if synthesis.end_index > after {
                synthesis.end_index += by;
            }
        }
        Ok(())
    }

    fn allocate_synthesis_id(&mut self) -> Result<SynthesisId, Error> {
        Ok(SynthesisId(self.ids.fetch_add(1, Ordering::Relaxed) + 1))
    }

    fn insert_synthesis(&mut self, synthesis: SynthesisRecord) -> Result<(), Error> {
        if self.staged.syntheses.contains_key(&synthesis.id) {
            return Err(Error::Storage(format!("duplicate synthesis {}", synthesis.id)));
        }
        self.staged.syntheses.insert(synthesis.id, synthesis);
        Ok(())
    }

    fn insert_records(&mut self, records: Vec<TrajectoryRecord>) -> Result<(), Error> {
        for rec in records {
            match self
                .staged
                .records
                .binary_search_by_key(&rec.index, |r| r.index)
            {
                Ok(_) => {
                    return Err(Error::Storage(format!("index #{} is taken", rec.index)));
                },
                Err(pos) => self.staged.records.insert(pos, rec),
            }
        }
        Ok(())
    }

    fn detach_synthesis(&mut self, id: SynthesisId) -> Result<usize, Error> {
        if self.staged.syntheses.remove(&id).is_none() {
            return Err(Error::UnknownSynthesis(id));
        }
        let mut count = 0;
        for rec in self.staged.records.iter_mut() {
            if rec.synthesis == Some(id) {
                rec.detach();
                count += 1;
            }
        }
        Ok(count)
    }
}
