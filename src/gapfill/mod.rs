//! Gap-fill orchestration: curve sampling, kinematic interpolation,
//! datum materialization and storage.
use itertools::Itertools;
use log::{debug, info};

use crate::{
    cfg::Config,
    curve::{CurveDefinition, CurvePath},
    error::Error,
    position::Positions,
    prelude::{Duration, Epoch},
    store::TrackStore,
    track::{Anchor, Gap, SynthesisId, SynthesisRecord, TrackId, TrajectoryRecord},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub(crate) mod validator;

use validator::{ValidatedGap, Validator};

/// Gap-fill request, as submitted for preview or commit.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GapFillRequest {
    pub track: TrackId,
    /// Start anchor index
    pub start_index: u64,
    /// End anchor index
    pub end_index: u64,
    /// Replacement path, anchors included
    pub curve: CurveDefinition,
    /// Sampling interval
    pub interval: Duration,
}

/// Synthesized point, prior storage.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SyntheticPoint {
    /// Index this point receives once committed
    pub index: u64,
    pub epoch: Epoch,
    /// Position in all three datums
    pub position: Positions,
    /// Speed (m/s)
    pub speed: f64,
    /// Heading (degrees)
    pub heading: f64,
    /// Elevation (m)
    pub elevation: Option<f64>,
}

impl SyntheticPoint {
    /// Converts to a [TrajectoryRecord] owned by given synthesis
    pub fn into_record(self, synthesis: SynthesisId) -> TrajectoryRecord {
        TrajectoryRecord {
            index: self.index,
            epoch: self.epoch,
            position: self.position,
            speed: self.speed,
            heading: self.heading,
            elevation: self.elevation,
            synthesized: true,
            synthesis: Some(synthesis),
        }
    }
}

/// Synthesizes `count` points between two anchors: geometry from the curve
/// (uniform arc length), kinematics from elapsed time. Both are independent
/// so a detour does not distort the speed profile.
fn synthesize(
    cfg: &Config,
    curve: &CurveDefinition,
    interval: Duration,
    gap: &ValidatedGap,
) -> Vec<SyntheticPoint> {
    let ValidatedGap { start, end, count } = gap;

    let path = CurvePath::new(curve, &cfg.curve);
    let geometry = path.generate_points(count + 2);

    debug!(
        "#{}..#{}: curve length={:.3}m ({}), {} sample(s)",
        start.index,
        end.index,
        path.length(),
        path.datum(),
        count
    );

    let interval_ns = interval.total_nanoseconds();

    geometry
        .iter()
        .skip(1)
        .take(*count)
        .enumerate()
        .map(|(k, point)| {
            let i = k as u64 + 1;
            let epoch = start.epoch() + Duration::from_total_nanoseconds(interval_ns * i as i128);
            let state = start.state.interpolate_at(&end.state, epoch);
            SyntheticPoint {
                index: start.index + i,
                epoch,
                position: Positions::from_point(point),
                speed: state.speed,
                heading: state.heading,
                elevation: state.elevation,
            }
        })
        .collect()
}

/// [GapFiller] drives gap interpolations on a [TrackStore].
pub struct GapFiller<S: TrackStore> {
    /// [Config] in use
    pub cfg: Config,
    store: S,
}

impl<S: TrackStore> GapFiller<S> {
    /// Creates a new [GapFiller]
    pub fn new(cfg: &Config, store: S) -> Self {
        Self {
            cfg: cfg.clone(),
            store,
        }
    }

    /// Underlying [TrackStore]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Lists the gaps of a track: consecutive recorded (not synthesized)
    /// points separated by at least `min_interval`.
    pub fn list_gaps(&self, track: TrackId, min_interval: Duration) -> Result<Vec<Gap>, Error> {
        let snapshot = self.store.snapshot(track)?;
        Ok(snapshot
            .records
            .iter()
            .tuple_windows()
            .filter(|(lhs, rhs)| !lhs.synthesized && !rhs.synthesized)
            .filter_map(|(lhs, rhs)| {
                let interval = rhs.epoch - lhs.epoch;
                if interval >= min_interval {
                    Some(Gap {
                        start_index: lhs.index,
                        end_index: rhs.index,
                        interval,
                        start: lhs.epoch,
                        end: rhs.epoch,
                    })
                } else {
                    None
                }
            })
            .collect())
    }

    /// Returns both [Anchor]s of a gap, expressed in the primary datum.
    /// Use their positions to build the [CurveDefinition].
    pub fn anchors(
        &self,
        track: TrackId,
        start_index: u64,
        end_index: u64,
    ) -> Result<(Anchor, Anchor), Error> {
        let snapshot = self.store.snapshot(track)?;
        let start = snapshot
            .record(start_index)
            .ok_or(Error::UnknownIndex(start_index))?;
        let end = snapshot
            .record(end_index)
            .ok_or(Error::UnknownIndex(end_index))?;
        Ok((
            Anchor::from_record(start, self.cfg.datum),
            Anchor::from_record(end, self.cfg.datum),
        ))
    }

    /// Runs the whole interpolation, without storing anything.
    pub fn preview(&self, request: &GapFillRequest) -> Result<Vec<SyntheticPoint>, Error> {
        let snapshot = self.store.snapshot(request.track)?;
        let gap = Validator::new(&self.cfg, &snapshot).validate(request)?;
        Ok(synthesize(&self.cfg, &request.curve, request.interval, &gap))
    }

    /// Interpolates and stores the synthesized points, atomically.
    /// Following records are shifted to make room.
    /// [Error::Conflict] is returned when the track was modified meanwhile:
    /// you may submit the request again.
    pub fn commit(&self, request: &GapFillRequest) -> Result<SynthesisRecord, Error> {
        let track = request.track;
        let snapshot = self.store.snapshot(track)?;
        let gap = Validator::new(&self.cfg, &snapshot).validate(request)?;
        let points = synthesize(&self.cfg, &request.curve, request.interval, &gap);
        let count = points.len();

        let synthesis = self.store.transaction(track, snapshot.version, |tx| {
            tx.shift_indices(gap.start.index, count as u64)?;

            let id = tx.allocate_synthesis_id()?;

            tx.insert_records(
                points
                    .into_iter()
                    .map(|point| point.into_record(id))
                    .collect(),
            )?;

            let synthesis = SynthesisRecord {
                id,
                track,
                start_index: gap.start.index,
                end_index: gap.end.index + count as u64,
                curve: request.curve.clone(),
                interval: request.interval,
                count,
            };

            tx.insert_synthesis(synthesis.clone())?;
            Ok(synthesis)
        })?;

        info!(
            "{}: synthesis {} committed, {} point(s) in #{}..#{}",
            track, synthesis.id, synthesis.count, synthesis.start_index, synthesis.end_index
        );

        Ok(synthesis)
    }

    /// Reverts a synthesis: its records are detached (they become regular
    /// records), no index is modified.
    pub fn revert(&self, id: SynthesisId) -> Result<(), Error> {
        let synthesis = self.store.synthesis(id)?;
        let snapshot = self.store.snapshot(synthesis.track)?;

        let detached = self
            .store
            .transaction(synthesis.track, snapshot.version, |tx| {
                tx.detach_synthesis(id)
            })?;

        info!(
            "{}: synthesis {} reverted, {} record(s) detached",
            synthesis.track, id, detached
        );
        Ok(())
    }
}
